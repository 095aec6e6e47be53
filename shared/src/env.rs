pub enum Environment {
    Development,
    Production,
}

/// Decides the runtime environment from the ENV variable,
/// falling back on the build profile.
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match std::env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => match v.to_lowercase().as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        },
    }
}
