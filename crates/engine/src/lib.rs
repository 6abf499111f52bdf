pub mod dedup;
pub mod interpreter;
pub mod validator;
pub mod watcher;
