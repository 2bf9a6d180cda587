#[tokio::main]
async fn main() {
    fest_server::run().await;
}
