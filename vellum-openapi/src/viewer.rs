use crate::config::{OpenApiConfig, Viewer};

const SCALAR_CDN: &str = "https://cdn.jsdelivr.net/npm/@scalar/api-reference";
const SWAGGER_UI_CSS: &str = "https://unpkg.com/swagger-ui-dist/swagger-ui.css";
const SWAGGER_UI_JS: &str = "https://unpkg.com/swagger-ui-dist/swagger-ui-bundle.js";

/// Render the documentation page for the configured viewer.
///
/// With `inline_spec` the document JSON is embedded directly into the page;
/// otherwise the page references the spec endpoint by URL.
pub(crate) fn render_page(config: &OpenApiConfig, inline_spec: Option<&str>) -> String {
    match config.viewer {
        Viewer::Scalar => scalar_page(config, inline_spec),
        Viewer::SwaggerUi => swagger_page(config, inline_spec),
    }
}

fn scalar_page(config: &OpenApiConfig, inline_spec: Option<&str>) -> String {
    let title = &config.title;
    let configuration = config
        .scalar_options
        .as_ref()
        .and_then(|options| serde_json::to_string(options).ok())
        .map(|json| {
            format!(
                " data-configuration='{}'",
                json.replace('\'', "&#39;")
            )
        })
        .unwrap_or_default();

    let reference = match inline_spec {
        Some(spec) => format!(
            r#"<script id="api-reference" type="application/json"{configuration}>{}</script>"#,
            escape_script(spec)
        ),
        None => format!(
            r#"<script id="api-reference" data-url="{}"{configuration}></script>"#,
            config.spec_path
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body>
    {reference}
    <script src="{SCALAR_CDN}"></script>
</body>
</html>"#
    )
}

fn swagger_page(config: &OpenApiConfig, inline_spec: Option<&str>) -> String {
    let title = &config.title;
    let source = match inline_spec {
        Some(spec) => format!("spec: {}", escape_script(spec)),
        None => format!("url: \"{}\"", config.spec_path),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{SWAGGER_UI_CSS}">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="{SWAGGER_UI_JS}"></script>
    <script>
        window.ui = SwaggerUIBundle({{
            {source},
            dom_id: "#swagger-ui"
        }});
    </script>
</body>
</html>"##
    )
}

// A literal `</script>` inside embedded JSON would terminate the tag early.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
