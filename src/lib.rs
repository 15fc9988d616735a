pub mod core {
    pub mod config;
    pub mod error;
    pub mod tracing_init;
}

pub mod models {
    pub mod requests;
    pub mod user;
}

pub mod stores {
    pub mod credentials;
}

pub mod session {
    pub mod handle;
    pub mod manager;
}

pub mod api {
    pub mod client;
}

pub mod access {
    pub mod gate;
}

pub mod validation {
    pub mod registration;
}

pub mod console {
    pub mod commands;
    pub mod render;
    pub mod repl;
}

#[cfg(test)]
pub mod testutil;
