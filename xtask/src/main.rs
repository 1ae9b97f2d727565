use camino::{Utf8Path, Utf8PathBuf};
use natal_chart::{ChartData, ChartSummary, RenderOptions, render_svg};
use rayon::prelude::*;
use std::fs;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  render-gallery      Render every chart fixture to SVG plus an HTML index");
        eprintln!("  summary <file>      Print the position report of one chart file");
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "render-gallery" => render_gallery(),
        "summary" => match args.get(2) {
            Some(path) => print_summary(Utf8Path::new(path)),
            None => Err("summary needs a chart file".into()),
        },
        _ => Err(format!("Unknown command: {}", args[1]).into()),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn workspace_root() -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

fn load_chart(path: &Utf8Path) -> Result<ChartData> {
    let source = fs::read_to_string(path)?;
    Ok(ChartData::from_json(path.as_str(), &source)?)
}

fn print_summary(path: &Utf8Path) -> Result<()> {
    let chart = load_chart(path)?;
    print!("{}", ChartSummary::from_chart(&chart));
    Ok(())
}

/// Outcome of rendering one fixture.
struct Rendered {
    name: String,
    svg: std::result::Result<String, String>,
    bodies: usize,
    aspects: usize,
}

fn render_one(path: &Utf8Path, options: &RenderOptions) -> Rendered {
    let name = path.file_stem().unwrap_or(path.as_str()).to_string();
    match load_chart(path) {
        Ok(chart) => Rendered {
            name,
            svg: render_svg(&chart, options).map_err(|e| e.to_string()),
            bodies: chart.planet_positions.len(),
            aspects: chart.aspects.len(),
        },
        Err(e) => Rendered {
            name,
            svg: Err(e.to_string()),
            bodies: 0,
            aspects: 0,
        },
    }
}

fn render_gallery() -> Result<()> {
    let root = workspace_root();
    let charts_dir = root.join("tests/charts");
    let out_dir = root.join("target/gallery");
    fs::create_dir_all(&out_dir)?;

    let mut paths = Vec::new();
    for entry in charts_dir.read_dir_utf8()? {
        let path = entry?.into_path();
        if path.extension() == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    // one chart per task; each render is single-threaded
    let options = RenderOptions::default();
    let results: Vec<Rendered> = paths
        .par_iter()
        .map(|path| {
            eprintln!("Rendering {}...", path.file_name().unwrap_or(path.as_str()));
            render_one(path, &options)
        })
        .collect();

    for rendered in &results {
        if let Ok(svg) = &rendered.svg {
            fs::write(out_dir.join(format!("{}.svg", rendered.name)), svg)?;
        }
    }

    let failed = results.iter().filter(|r| r.svg.is_err()).count();
    let index = out_dir.join("index.html");
    fs::write(&index, gallery_html(&results))?;
    eprintln!(
        "Wrote {} charts ({} failed) to {}",
        results.len(),
        failed,
        index
    );
    Ok(())
}

fn gallery_html(results: &[Rendered]) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Chart gallery</title>
    <style>
        body {
            font-family: system-ui, sans-serif;
            margin: 0;
            padding: 24px;
            background: #eee;
            color: #333;
        }
        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(420px, 1fr));
            gap: 16px;
        }
        .card {
            background: #fff;
            border-radius: 6px;
            padding: 12px;
        }
        .card img {
            width: 100%;
        }
        .meta {
            font-size: 13px;
            color: #666;
        }
        .error {
            color: #c00;
            white-space: pre-wrap;
            font-family: monospace;
        }
    </style>
</head>
<body>
<h1>Chart gallery</h1>
<div class="grid">
"#,
    );

    for r in results {
        html.push_str("<div class=\"card\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", html_escape(&r.name)));
        match &r.svg {
            Ok(_) => {
                html.push_str(&format!(
                    "<div class=\"meta\">{} bodies, {} aspects</div>\n",
                    r.bodies, r.aspects
                ));
                html.push_str(&format!(
                    "<img src=\"{}.svg\" alt=\"{}\">\n",
                    html_escape(&r.name),
                    html_escape(&r.name)
                ));
            }
            Err(e) => {
                html.push_str(&format!("<div class=\"error\">{}</div>\n", html_escape(e)));
            }
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
