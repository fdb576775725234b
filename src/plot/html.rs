//! Standalone HTML pages wrapping an inline SVG chart.

use std::fs;
use std::path::Path;

use chrono::Local;

use crate::error::AppError;

/// Wrap `svg` in a self-contained page (no external assets).
pub fn html_page(title: &str, svg: &str) -> String {
    let generated = Local::now().format("%Y-%m-%d %H:%M");
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ margin: 0; background: #111111; color: #f2f5fa; font-family: sans-serif; }}
  main {{ max-width: 1100px; margin: 0 auto; padding: 24px; }}
  h1 {{ font-size: 20px; font-weight: normal; }}
  footer {{ font-size: 12px; color: #8a94a6; margin-top: 12px; }}
  svg {{ max-width: 100%; height: auto; }}
</style>
</head>
<body>
<main>
<h1>{title}</h1>
{svg}
<footer>Fuente: INE. Generado {generated}.</footer>
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn write_html(path: &Path, title: &str, svg: &str) -> Result<(), AppError> {
    fs::write(path, html_page(title, svg))
        .map_err(|e| AppError::output(format!("Failed to write chart '{}': {e}", path.display())))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_embeds_svg_and_escapes_title() {
        let page = html_page("IPC <> IPV", "<svg></svg>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>IPC &lt;&gt; IPV</title>"));
        assert!(page.contains("<svg></svg>"));
    }
}
