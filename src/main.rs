mod cmd;

use std::process;

use anyhow::Result;
use clap::error::ErrorKind as ArgsErrorKind;
use clap::Parser;
use singalong::api::error::ApiError;

use cmd::App;

async fn run_cmd() -> Result<()> {
    let app = match App::try_parse() {
        Ok(app) => app,
        Err(err) => {
            err.use_stderr();
            _ = err.print();
            if matches!(
                err.kind(),
                ArgsErrorKind::DisplayHelp
                    | ArgsErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    | ArgsErrorKind::DisplayVersion
            ) {
                return Ok(());
            }
            process::exit(3);
        }
    };

    app.run().await
}

#[tokio::main]
async fn main() {
    match run_cmd().await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Command error: {e:#}");
            if let Some(details) = e
                .downcast_ref::<ApiError>()
                .and_then(|api_err| api_err.details.as_ref())
            {
                if let Ok(details) = serde_json::to_string_pretty(details) {
                    eprintln!("Details: {details}");
                }
            }
            process::exit(1);
        }
    }
}
