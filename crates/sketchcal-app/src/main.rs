//! Main application entry point.

use sketchcal_app::{App, AppConfig, Session, SessionError, ShortcutRegistry};
use sketchcal_core::settings::Settings;

const USAGE: &str = "Usage: sketchcal [--settings <settings.json>] <session.json>";

fn main() -> Result<(), SessionError> {
    env_logger::init();

    let mut script = None;
    let mut settings_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let path = args
                    .next()
                    .ok_or_else(|| SessionError::Usage("--settings needs a path".to_string()))?;
                settings_path = Some(path);
            }
            "-h" | "--help" => {
                println!("{}\n\n{}", USAGE, ShortcutRegistry::help());
                return Ok(());
            }
            _ => script = Some(arg),
        }
    }
    let script = script.ok_or_else(|| SessionError::Usage(USAGE.to_string()))?;

    let settings = match settings_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let session = Session::load(&script)?;
    log::info!("Starting SketchCal session {}", script);

    let mut app = App::new(settings, session.calendars.clone(), AppConfig::default())
        .with_now(session.now);
    let frames = app.run(&session)?;
    println!("{}", serde_json::to_string_pretty(&frames)?);
    Ok(())
}
