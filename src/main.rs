#[tokio::main]
async fn main() -> anyhow::Result<()> {
    contractsig_calculator_lib::run().await
}
