use anyhow::Result;
use colored::Colorize;
use estate_core::{CatalogService, CreateProperty, PropertyFilter, UpdateProperty};

use crate::cli::{OutputFormat, PropertyCommands};
use crate::output;

/// Execute properties subcommand
pub async fn execute(
    service: &CatalogService,
    format: OutputFormat,
    cmd: PropertyCommands,
) -> Result<()> {
    match cmd {
        PropertyCommands::List => output::print_list(&service.list_properties().await?, format),
        PropertyCommands::Get { id } => {
            output::print_one(&service.get_property(id).await?, format)
        }
        PropertyCommands::Search {
            name,
            address,
            min_price,
            max_price,
        } => {
            let filter = search_filter(name, address, min_price, max_price);
            output::print_list(&service.search_properties(&filter).await?, format)
        }
        PropertyCommands::ByOwner { owner_id } => {
            output::print_list(&service.properties_by_owner(owner_id).await?, format)
        }
        PropertyCommands::Create {
            name,
            address,
            price,
            code_internal,
            year,
            owner_id,
        } => {
            let property = service
                .create_property(CreateProperty {
                    name,
                    address,
                    price,
                    code_internal,
                    year,
                    owner_id,
                })
                .await?;
            output::print_one(&property, format)
        }
        PropertyCommands::Update {
            id,
            name,
            address,
            price,
            code_internal,
            year,
            owner_id,
        } => {
            let property = service
                .update_property(UpdateProperty {
                    id,
                    name,
                    address,
                    price,
                    code_internal,
                    year,
                    owner_id,
                })
                .await?;
            output::print_one(&property, format)
        }
        PropertyCommands::Delete { id } => {
            service.delete_property(id).await?;
            println!(
                "{} property {} with its images and traces",
                "Deleted".green().bold(),
                id
            );
            Ok(())
        }
    }
}

/// Criteria from the search flags; absent flags leave that criterion out
pub fn search_filter(
    name: Option<String>,
    address: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> PropertyFilter {
    let mut filter = PropertyFilter::new();
    if let Some(name) = name {
        filter = filter.name(name);
    }
    if let Some(address) = address {
        filter = filter.address(address);
    }
    if let Some(min_price) = min_price {
        filter = filter.min_price(min_price);
    }
    if let Some(max_price) = max_price {
        filter = filter.max_price(max_price);
    }
    filter
}
