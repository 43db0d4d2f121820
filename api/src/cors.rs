use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::{AllowedOrigins, CorsConfig};

/// Builds the CORS layer. Credentials cannot be combined with a literal `*`,
/// so "any" is expressed by mirroring whatever the browser sent.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    // In prod, restrict this via CORS_ALLOWED_ORIGINS
    let origin = match &config.origins {
        AllowedOrigins::Any if config.allow_credentials => AllowOrigin::mirror_request(),
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(origins) => {
            let values = origins
                .iter()
                .map(|o| {
                    HeaderValue::from_str(o)
                        .with_context(|| format!("invalid CORS origin '{}'", o))
                })
                .collect::<Result<Vec<_>>>()?;
            AllowOrigin::list(values)
        }
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials))
}
