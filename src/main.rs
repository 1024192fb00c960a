#[tokio::main]
async fn main() {
    if let Err(e) = practice_booking::run().await {
        eprintln!("practice_booking failed to start: {}", e);
        std::process::exit(1);
    }
}
