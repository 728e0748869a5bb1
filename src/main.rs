mod clock;
mod config;
mod controller;
mod error;
mod events;
mod location;
mod renderer;
mod solar;
mod sources;
mod viewport;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use config::Config;
use controller::Controller;
use events::Event;
use location::{find_city, strategies, Resolution};
use sources::HttpSources;

fn draw(controller: &Controller, path: &Path) {
    match renderer::render_png(&controller.frame(), path) {
        Ok(_) => info!("Wrote {}", path.display()),
        Err(e) => warn!("Could not render {}: {e}", path.display()),
    }
}

async fn run_events(controller: &mut Controller, output: &Path) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = match line.parse::<Event>() {
            Ok(event) => event,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        match event {
            Event::Move(pointer) => {
                if let Some(panel) = controller.pointer_moved(pointer) {
                    let [_, hours, percent] = panel.lines();
                    println!("{} {hours} {percent}", panel.icon());
                }
            }
            Event::Resize(viewport) => controller.resize(viewport),
            Event::City(name) => {
                controller.select_city(&name).await;
            }
            Event::Render(path) => draw(controller, path.as_deref().unwrap_or(output)),
            Event::Quit => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::load()?;
    let http = Arc::new(HttpSources::new(&config)?);

    let resolution = match config.city.as_deref().map(|name| (name, find_city(name))) {
        Some((_, Some(city))) => Resolution::from_city(city),
        Some((name, None)) => {
            warn!("Unknown city {name:?}, resolving location instead");
            strategies::standard_chain(&config, http.clone()).resolve().await
        }
        None => strategies::standard_chain(&config, http.clone()).resolve().await,
    };

    let mut controller = Controller::new(http.clone(), http, config.viewport);
    controller.load(resolution).await;
    if let Some(pointer) = config.pointer {
        controller.pointer_moved(pointer);
    }

    let output = PathBuf::from(&config.output_path);
    draw(&controller, &output);

    if config.interactive {
        info!("Reading events from stdin");
        run_events(&mut controller, &output).await?;
    }

    Ok(())
}
