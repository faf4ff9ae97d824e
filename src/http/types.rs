use std::sync::Arc;

use crate::config::Config;
use crate::media::MediaStore;
use crate::speech::SpeechRecognizer;

/// Shared per-process state. Handlers open their own store connection from
/// `config.db_path` on every request; nothing here holds a connection.
pub struct AppState {
    pub config: Config,
    pub media: MediaStore,
    pub recognizer: Arc<dyn SpeechRecognizer>,
}
