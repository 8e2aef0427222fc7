use std::path::Path;

use crate::{
    InitArgs,
    config::{Config, DEFAULT_CONFIG_FILE},
};

const INDEX_MD: &str = "---
title: Home
layout: base.html
---
# Welcome

Write posts under `src/posts/` and tag them with `posts`.
";

const NOT_FOUND_MD: &str = "---
title: Page not found
layout: base.html
permalink: 404.html
---
# Page not found

Nothing lives at this address. Head back to the [home page](/).
";

const BASE_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{{ page.title }} | {{ site.name }}</title>
    <link rel="stylesheet" href="/assets/css/highlight.css">
  </head>
  <body>
    <main>
      {% if page.date %}<p>{{ page.date }} · {{ content | readTime }} min read</p>{% endif %}
      {{ content | safe }}
    </main>
    <footer>
      {% for tag in collections.tagList %}<span class="tag">{{ tag }}</span> {% endfor %}
    </footer>
  </body>
</html>
"#;

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            tracing::info!("created directory {}", path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    let config_file = path.join(DEFAULT_CONFIG_FILE);
    if config_file.exists() {
        return Err(anyhow::anyhow!(
            "{} already exists, refusing to overwrite",
            config_file.display()
        ));
    }

    tracing::info!("initializing project in {}", path.display());

    let config = Config::default();
    tokio::fs::write(&config_file, serde_yaml::to_string(&config)?).await?;
    tracing::info!("created config file {}", config_file.display());

    let input = path.join(&config.site.input);
    write_starter(&input.join("index.md"), INDEX_MD).await?;
    write_starter(&input.join("404.md"), NOT_FOUND_MD).await?;
    write_starter(&input.join(&config.site.includes).join("base.html"), BASE_HTML).await?;
    tokio::fs::create_dir_all(input.join("assets/img/posts")).await?;

    Ok(())
}

/// Write a starter file unless the author already has one.
async fn write_starter(path: &Path, contents: &str) -> Result<(), anyhow::Error> {
    if path.exists() {
        tracing::debug!("keeping existing {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    tracing::info!("created {}", path.display());
    Ok(())
}
