use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "housegen_backend=debug,tower_http=debug,info",
        Environment::Staging => "housegen_backend=debug,tower_http=info,info",
        Environment::Prod => "housegen_backend=info,tower_http=info,warn",
    }
}

fn env_filter(env: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(env)))
}

/// Installs the global subscriber: pretty output outside prod, JSON in prod.
pub fn init_logging(env: &Environment) {
    let filter = env_filter(env);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    let registry = tracing_subscriber::registry().with(filter);
    if env.is_prod() {
        registry.with(fmt_layer.json().flatten_event(true)).init();
    } else {
        registry.with(fmt_layer.pretty()).init();
    }

    tracing::info!(env = env.as_str(), "Logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_environment_has_parseable_directives() {
        for env in [Environment::Dev, Environment::Staging, Environment::Prod] {
            let directives = default_directives(&env);
            assert!(directives.starts_with("housegen_backend="));
            assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
        }
    }

    #[test]
    fn prod_is_quieter_than_dev() {
        assert!(default_directives(&Environment::Prod).ends_with(",warn"));
        assert!(default_directives(&Environment::Dev).contains("housegen_backend=debug"));
    }
}
