use super::handlers::{health, orders};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
/// Routes added outside (like `/` or `OPTIONS /health`) are intentionally not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(orders::create_order))
        .routes(routes!(orders::create_user_order))
        .routes(routes!(orders::list_orders))
        .routes(routes!(
            orders::get_order,
            orders::update_order,
            orders::delete_order
        ))
        .routes(routes!(orders::update_order_status))
        .routes(routes!(orders::schedule_status_advance))
        .routes(routes!(orders::list_user_orders));

    let mut orders_tag = Tag::new("orders");
    orders_tag.description = Some("Racket stringing order management API".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service readiness probes".to_string());

    router.get_openapi_mut().tags = Some(vec![orders_tag, health_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    // Cargo authors look like "Name <email>"; take the first one.
    let author = env!("CARGO_PKG_AUTHORS").split(';').next().unwrap_or("");
    let (name, email) = match author.split_once('<') {
        Some((name, email)) => (name.trim(), email.trim_end_matches('>').trim()),
        None => (author.trim(), ""),
    };
    if !name.is_empty() || !email.is_empty() {
        let mut contact = Contact::new();
        contact.name = (!name.is_empty()).then(|| name.to_string());
        contact.email = (!email.is_empty()).then(|| email.to_string());
        info.contact = Some(contact);
    }

    let mut license = License::new(env!("CARGO_PKG_LICENSE"));
    license.identifier = Some(env!("CARGO_PKG_LICENSE").to_string());
    info.license = Some(license);

    OpenApiBuilder::new().info(info).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            spec.info.description.as_deref(),
            Some(env!("CARGO_PKG_DESCRIPTION"))
        );

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Restring"));
            assert_eq!(contact.email.as_deref(), Some("team@restring.dev"));
        }

        let license = spec.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.name, "BSD-3-Clause");
            assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
        }
    }

    #[test]
    fn openapi_tags_and_paths() {
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "orders"));
        assert!(tags.iter().any(|tag| tag.name == "health"));

        for path in [
            "/orders/order_stringing",
            "/orders/order_stringing/user/{user_id}",
            "/orders/orders/",
            "/orders/orders/{id}",
            "/orders/orders/{id}/status",
            "/orders/order_async_update/{id}",
            "/orders/orders/user/{user_id}",
        ] {
            assert!(
                spec.paths.paths.contains_key(path),
                "missing path: {path}"
            );
        }
    }

    #[test]
    fn openapi_registers_all_order_methods() {
        let spec = openapi();
        let item = spec
            .paths
            .paths
            .get("/orders/orders/{id}")
            .expect("order detail path");
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }
}
