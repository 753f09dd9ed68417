mod studio_assets;

pub use studio_assets::{read_catalog_asset, read_layout_asset};
