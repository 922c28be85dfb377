mod input;

use std::process::ExitCode;

use crate::input::ExampleInput;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    ta_modinput::main_with(ExampleInput).await
}
