//! Catalog browsing commands.

use clap::Subcommand;

use ecom_market_core::{BrandId, CategoryId, ProductId};
use ecom_market_storefront::api::ProductQuery;
use ecom_market_storefront::api::types::ProductSummary;
use ecom_market_storefront::session::StoreSession;

use super::CliError;

/// Catalog subcommands.
#[derive(Subcommand)]
pub enum CatalogAction {
    /// List products
    List {
        /// Full-text search string
        #[arg(long)]
        search: Option<String>,
        /// Restrict to one category
        #[arg(long)]
        category: Option<i32>,
        /// Restrict to one brand
        #[arg(long)]
        brand: Option<i32>,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one product
    Show {
        /// Product ID
        product_id: i32,
    },
    /// List categories
    Categories,
    /// List brands
    Brands,
}

/// Run a catalog subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn run(session: &StoreSession, action: CatalogAction) -> Result<(), CliError> {
    match action {
        CatalogAction::List {
            search,
            category,
            brand,
            limit,
        } => {
            let query = ProductQuery {
                search,
                category: category.map(CategoryId::new),
                brand: brand.map(BrandId::new),
                limit,
                ..ProductQuery::default()
            };
            let products = session.api().products(&query).await?;
            print_products(&products);
        }
        CatalogAction::Show { product_id } => {
            let product = session.api().product(ProductId::new(product_id)).await?;
            print_product_detail(&product);
        }
        CatalogAction::Categories => {
            let categories = session.api().categories().await?;
            print_rows(categories.iter().map(|c| (c.id.as_i32(), c.name.as_str())));
        }
        CatalogAction::Brands => {
            let brands = session.api().brands().await?;
            print_rows(brands.iter().map(|b| (b.id.as_i32(), b.name.as_str())));
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[ProductSummary]) {
    for product in products {
        println!(
            "{:>6}  {:<48} {:>14}  {}",
            product.id,
            product.name,
            product.price.to_string(),
            product.part_number
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_product_detail(product: &ecom_market_storefront::api::types::ProductDetail) {
    println!("{} (#{})", product.name, product.id);
    println!("  part number: {}", product.part_number);
    println!("  price:       {}", product.price);
    println!("  category:    {}", product.category.name);
    if let Some(description) = &product.description {
        println!("  {description}");
    }
    for image in &product.images {
        println!("  image: {}{}", image.url, if image.is_main { " (main)" } else { "" });
    }
}

#[allow(clippy::print_stdout)]
fn print_rows<'a>(rows: impl Iterator<Item = (i32, &'a str)>) {
    for (id, name) in rows {
        println!("{id:>6}  {name}");
    }
}
