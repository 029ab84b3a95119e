//! Handling server binary.

use anyhow::Result;
use handling_server::network::NetworkModule;
use handling_server::{terminate_signal, Application, Args, ServerConfig, Supervisor, Termination};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let fmt_layer = if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ServerConfig::from_args(Args::parse_single_dash(std::env::args_os()));
    let recorder = PrometheusBuilder::new().build_recorder();
    let app = Application::build(&config, &recorder)?;

    let module = NetworkModule::new(config.network.http_addr.clone(), app.router());
    match Supervisor::new().run(module, terminate_signal()).await {
        Termination::Listener(Err(e)) => Err(e.into()),
        Termination::Listener(Ok(())) | Termination::Signal(_) => Ok(()),
    }
}
