//! # Tool Catalog
//!
//! Fetches the tools a session currently advertises, in the shape offered to
//! the model. Not cached: every cycle asks the session again.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::error::BridgeError;
use crate::domain::traits::ToolSession;
use crate::domain::types::ToolDescriptor;

pub async fn fetch_catalog(session: &dyn ToolSession) -> Result<Vec<ToolDescriptor>, BridgeError> {
    let tools = session.list_tools().await?;

    let mut seen = HashSet::new();
    let catalog: Vec<ToolDescriptor> = tools
        .into_iter()
        .filter(|tool| {
            let fresh = seen.insert(tool.name.clone());
            if !fresh {
                warn!(tool = %tool.name, "dropping duplicate tool from catalog");
            }
            fresh
        })
        .collect();

    debug!(tools = catalog.len(), "fetched tool catalog");
    Ok(catalog)
}
