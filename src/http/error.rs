use axum::response::Redirect;

/// Browser-facing actions answer with a redirect to the landing view carrying
/// a one-shot notification in the query string; the index page renders it.
fn flash_redirect(kind: &str, message: &str) -> Redirect {
    Redirect::to(&format!(
        "/?kind={}&msg={}",
        kind,
        urlencoding::encode(message)
    ))
}

pub fn redirect_ok(message: &str) -> Redirect {
    flash_redirect("success", message)
}

pub fn redirect_err(message: &str) -> Redirect {
    flash_redirect("error", message)
}
