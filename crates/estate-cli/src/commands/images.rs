use anyhow::Result;
use colored::Colorize;
use estate_core::{CatalogService, CreatePropertyImage, UpdatePropertyImage};

use crate::cli::{ImageCommands, OutputFormat};
use crate::output;

/// Execute images subcommand
pub async fn execute(service: &CatalogService, format: OutputFormat, cmd: ImageCommands) -> Result<()> {
    match cmd {
        ImageCommands::List { property_id } => {
            output::print_list(&service.list_images(property_id).await?, format)
        }
        ImageCommands::Get { id } => output::print_one(&service.get_image(id).await?, format),
        ImageCommands::Add {
            property_id,
            file,
            enabled,
        } => {
            let image = service
                .create_image(CreatePropertyImage {
                    property_id,
                    file,
                    enabled,
                })
                .await?;
            output::print_one(&image, format)
        }
        ImageCommands::Update {
            id,
            property_id,
            file,
            enabled,
        } => {
            let image = service
                .update_image(UpdatePropertyImage {
                    id,
                    property_id,
                    file,
                    enabled,
                })
                .await?;
            output::print_one(&image, format)
        }
        ImageCommands::Delete { id } => {
            service.delete_image(id).await?;
            println!("{} image {}", "Deleted".green().bold(), id);
            Ok(())
        }
    }
}
