use anyhow::Result;
use colored::Colorize;
use estate_core::{CatalogService, CreateOwner, UpdateOwner};

use crate::cli::{OutputFormat, OwnerCommands};
use crate::output;

/// Execute owners subcommand
pub async fn execute(service: &CatalogService, format: OutputFormat, cmd: OwnerCommands) -> Result<()> {
    match cmd {
        OwnerCommands::List => output::print_list(&service.list_owners().await?, format),
        OwnerCommands::Get { id } => output::print_one(&service.get_owner(id).await?, format),
        OwnerCommands::Create {
            name,
            address,
            photo,
            birthday,
        } => {
            let owner = service
                .create_owner(CreateOwner {
                    name,
                    address,
                    photo,
                    birthday,
                })
                .await?;
            output::print_one(&owner, format)
        }
        OwnerCommands::Update {
            id,
            name,
            address,
            photo,
            birthday,
        } => {
            let owner = service
                .update_owner(UpdateOwner {
                    id,
                    name,
                    address,
                    photo,
                    birthday,
                })
                .await?;
            output::print_one(&owner, format)
        }
        OwnerCommands::Delete { id } => {
            service.delete_owner(id).await?;
            println!("{} owner {}", "Deleted".green().bold(), id);
            Ok(())
        }
    }
}
