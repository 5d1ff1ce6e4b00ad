use log::{error, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::interval;

use trusty_draw::commands::{parse_command, USAGE};
use trusty_draw::handlers::{handle_command, Reply};
use trusty_draw::{DrawConfig, DrawEngine};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match DrawConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!("Starting with tick interval {:?}", config.tick_interval);

    let mut engine = DrawEngine::new(config.clone());
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut redraw = interval(config.tick_interval);
    let mut last_shown = String::new();

    if let Err(e) = write_out(&mut stdout, &format!("{}\n", USAGE)).await {
        error!("Failed to write to stdout: {}", e);
        return;
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break, // stdin closed
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                if !last_shown.is_empty() {
                    last_shown.clear();
                    let _ = write_out(&mut stdout, "\n").await;
                }

                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        let _ = write_out(&mut stdout, &format!("{}\n", message)).await;
                        continue;
                    }
                };

                match handle_command(&mut engine, command).await {
                    Ok(Reply::Text(text)) => {
                        let _ = write_out(&mut stdout, &format!("{}\n", text)).await;
                    }
                    Ok(Reply::Quit) => break,
                    Err(e) => {
                        error!("Command failed: {}", e);
                        let _ = write_out(&mut stdout, &format!("Error: {}\n", e)).await;
                    }
                }
            }
            _ = redraw.tick() => {
                if !engine.is_running() {
                    // the draw stopped itself
                    if !last_shown.is_empty() {
                        last_shown.clear();
                        let summary = format!("\nStopped. Winners so far: {}\n", engine.current_winners().join(", "));
                        let _ = write_out(&mut stdout, &summary).await;
                    }
                    continue;
                }
                let shown = engine.current_candidate();
                if shown != last_shown {
                    let _ = write_out(&mut stdout, &format!("\r>> {:<32}", shown)).await;
                    last_shown = shown;
                }
            }
        }
    }

    engine.reset();
    let _ = write_out(&mut stdout, "Bye.\n").await;
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}
