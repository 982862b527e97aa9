use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Routes advertised on the landing page
pub const API_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/1/<start2>",
    "/api/v1.0/<start>/<end>",
];

pub fn home_page(api_base: &str) -> Markup {
    let config = PageConfig {
        title: "SurfsUp Climate API",
        api_base,
    };

    base(&config, content(api_base))
}

fn content(api_base: &str) -> Markup {
    html! {
        "Available Routes:"
        br;
        @for route in API_ROUTES {
            // routes with placeholders are not directly followable
            @if route.contains('<') {
                (route)
            } @else {
                a href={ (api_base) (route) } { (route) }
            }
            br;
        }
    }
}
