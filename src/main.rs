#[tokio::main]
async fn main() {
    hospital_lib::init_tracing();

    if let Err(e) = hospital_lib::run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
