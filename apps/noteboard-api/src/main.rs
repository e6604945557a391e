use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = noteboard_api::Args::parse();
	noteboard_api::run(args).await
}
