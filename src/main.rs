use linkdeck::{
    configuration::get_configuration,
    startup,
    telementry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() {
    let cfg = get_configuration().expect("could not get config");

    let subscriber = get_subscriber(
        "linkdeck".into(),
        "info".into(),
        &cfg.telemetry.otlp_endpoint,
        std::io::stdout,
    );
    init_subscriber(subscriber);

    startup::run(cfg).await
}
