//! Display formatting for CLI output

use console::style;
use freighter_core::{Freight, Image};

/// One discovered image and where its source can be browsed
#[derive(Debug, Clone)]
pub struct ImageRow<'a> {
    pub image: &'a Image,
    pub source_url: Option<String>,
}

/// Format a discovered image as `repo:tag@digest`, with its source URL if known
pub fn format_image(row: &ImageRow<'_>) -> String {
    match &row.source_url {
        Some(url) => format!("{} ({})", row.image.reference(), url),
        None => row.image.reference(),
    }
}

/// Print the result of a discovery pass
pub fn print_freight(freight: &Freight, rows: &[ImageRow<'_>]) {
    if rows.is_empty() {
        println!(
            "{} Warehouse {} has no image subscriptions",
            style("⚠").yellow(),
            freight.warehouse
        );
    }

    for row in rows {
        println!("  {} {}", style("✓").green(), format_image(row));
    }

    println!();
    println!(
        "{} Freight {} ({} image(s))",
        style("→").blue(),
        style(&freight.id).bold(),
        freight.images.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_image() {
        let image = Image::new("ghcr.io/acme/api", "v1.0.0", "sha256:abc");

        let bare = ImageRow {
            image: &image,
            source_url: None,
        };
        assert_eq!(format_image(&bare), "ghcr.io/acme/api:v1.0.0@sha256:abc");

        let linked = ImageRow {
            image: &image,
            source_url: Some("https://github.com/acme/api/tree/v1.0.0".to_string()),
        };
        assert_eq!(
            format_image(&linked),
            "ghcr.io/acme/api:v1.0.0@sha256:abc (https://github.com/acme/api/tree/v1.0.0)"
        );
    }
}
