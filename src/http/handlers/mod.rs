pub mod assets;
pub mod attendance;
pub mod courses;
pub mod pages;
pub mod reports;
pub mod students;
