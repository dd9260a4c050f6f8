use anyhow::Result;
use estate_core::{CatalogService, CreatePropertyTrace};

use crate::cli::{OutputFormat, TraceCommands};
use crate::output;

/// Execute traces subcommand
pub async fn execute(service: &CatalogService, format: OutputFormat, cmd: TraceCommands) -> Result<()> {
    match cmd {
        TraceCommands::List { property_id } => {
            output::print_list(&service.list_traces(property_id).await?, format)
        }
        TraceCommands::Get { id } => output::print_one(&service.get_trace(id).await?, format),
        TraceCommands::Add {
            property_id,
            date_sale,
            name,
            value,
            tax,
        } => {
            let trace = service
                .create_trace(CreatePropertyTrace {
                    property_id,
                    date_sale,
                    name,
                    value,
                    tax,
                })
                .await?;
            output::print_one(&trace, format)
        }
    }
}
