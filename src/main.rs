#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    wasl_server::run().await
}
