use clap::{Parser, Subcommand};
use glowcart_client::CatalogClient;
use glowcart_core::{
    filter_and_sort, CategoryScope, Disclosure, FilterState, Product, GRID_BATCH_SIZE,
};

#[derive(Debug, Parser)]
#[command(name = "glowcart")]
#[command(about = "Glowcart storefront catalog tools")]
struct Cli {
    /// Shop origin, e.g. https://shop.example.com
    #[arg(long, env = "GLOWCART_SHOP_URL")]
    shop: String,

    /// Page size for catalog pagination requests.
    #[arg(long, default_value_t = 250)]
    page_size: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the catalog and print a per-product summary.
    Fetch,
    /// Apply grid filters locally and print the first disclosure window.
    Grid {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        skin_type: Option<String>,
        #[arg(long)]
        skin_concern: Option<String>,
        #[arg(long)]
        ingredient: Option<String>,
        /// PRICE_ASC, PRICE_DESC, UPDATED_AT, or RELEVANCE.
        #[arg(long)]
        sort: Option<String>,
        /// Price bucket as min-max, e.g. 15-25.
        #[arg(long)]
        price: Option<String>,
        /// How many results to reveal (defaults to one batch).
        #[arg(long)]
        show: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = CatalogClient::new(30, "glowcart-cli/0.1", 3, 1)?;
    let products = fetch_products(&client, &cli.shop, cli.page_size).await?;

    match cli.command {
        Commands::Fetch => {
            for product in &products {
                println!(
                    "{}\t{}\t{} {}\t{}",
                    product.id,
                    product.title,
                    product.price,
                    product.currency,
                    product.product_type.as_deref().unwrap_or("-"),
                );
            }
            println!("{} products", products.len());
        }
        Commands::Grid {
            category,
            skin_type,
            skin_concern,
            ingredient,
            sort,
            price,
            show,
        } => {
            let filters = FilterState {
                category,
                skin_type,
                skin_concern,
                ingredient,
                sort,
                price,
            };
            let filtered = filter_and_sort(&products, &filters, CategoryScope::ProductType);
            let total = filtered.len();
            let disclosure =
                Disclosure::resume(GRID_BATCH_SIZE, show.unwrap_or(GRID_BATCH_SIZE));
            let visible = disclosure.visible_count(total);

            for product in filtered.iter().take(visible) {
                let marker = if product.is_new { " [new]" } else { "" };
                println!(
                    "{}\t{} {}{}",
                    product.title, product.price, product.currency, marker
                );
            }
            println!(
                "showing {visible} of {total} ({:.0}%){}",
                disclosure.progress_percent(total),
                if disclosure.has_more(total) {
                    ", more available"
                } else {
                    ""
                }
            );
        }
    }

    Ok(())
}

async fn fetch_products(
    client: &CatalogClient,
    shop: &str,
    page_size: u32,
) -> anyhow::Result<Vec<Product>> {
    let wire = client.fetch_all_products(shop, page_size, 0).await?;
    let mut products = Vec::with_capacity(wire.len());
    for raw in wire {
        // CLI previews have no collection membership; category filtering
        // runs against product_type only.
        match glowcart_client::normalize_product(raw, Vec::new()) {
            Ok(product) => products.push(product),
            Err(error) => eprintln!("skipping product: {error}"),
        }
    }
    Ok(products)
}
