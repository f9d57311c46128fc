//! `folio check`: validate the collection without writing anything.

use anyhow::{Result, bail};

use super::common::load_collection;
use crate::{config::SiteConfig, debug, log, utils::plural_count};

pub fn check_site(config: &SiteConfig) -> Result<()> {
    let collection = match load_collection(config) {
        Ok(collection) => collection,
        Err(err) => {
            let Some(collection_err) = err.downcast_ref::<crate::content::CollectionError>() else {
                return Err(err);
            };
            let problems = collection_err.problems();
            for problem in &problems {
                log!("error"; "{problem}");
            }
            bail!(
                "collection '{}' failed validation ({})",
                config.content.collection,
                plural_count(problems.len(), "problem")
            );
        }
    };

    for entry in collection.iter() {
        debug!("check"; "{} -> {}", entry.id, entry.slug);
    }
    log!("check"; "{} valid", plural_count(collection.len(), "post"));
    Ok(())
}
