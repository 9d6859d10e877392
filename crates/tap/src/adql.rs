//! ADQL text for the audit queries. Query construction lives here, behind
//! identifier validation; nothing downstream ever assembles query strings.

use crate::error::TapError;

/// Product types an artifact may be registered under, paired with the
/// column alias each indicator takes in the profile query (aliases cannot
/// contain dashes).
pub const PRODUCT_TYPES: [(&str, &str); 17] = [
    ("this", "this"),
    ("science", "science"),
    ("calibration", "calibration"),
    ("preview", "preview"),
    ("thumbnail", "thumbnail"),
    ("auxiliary", "auxiliary"),
    ("bias", "bias"),
    ("coderived", "coderived"),
    ("dark", "dark"),
    ("documentation", "documentation"),
    ("error", "error"),
    ("flat", "flat"),
    ("info", "info"),
    ("noise", "noise"),
    ("preview-image", "preview_image"),
    ("preview-plot", "preview_plot"),
    ("weight", "weight"),
];

/// Reject values that cannot be safely interpolated into an ADQL string
/// literal. Collection names and SI namespaces are plain identifiers with
/// at most `:`, `/`, `-`, `_`, `.` and `+` in them.
fn validate_identifier(value: &str) -> Result<&str, TapError> {
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '/' | '-' | '_' | '.' | '+'));
    if ok {
        Ok(value)
    } else {
        Err(TapError::InvalidIdentifier {
            value: value.to_string(),
        })
    }
}

/// Artifact listing from the CAOM repository for one collection,
/// restricted to one SI namespace.
pub fn caom_artifact_query(collection: &str, namespace: &str) -> Result<String, TapError> {
    let collection = validate_identifier(collection)?;
    let namespace = validate_identifier(namespace)?;
    Ok(format!(
        "SELECT A.uri AS uri, A.contentChecksum AS contentChecksum, \
         A.contentLength AS contentLength, A.contentType AS contentType, \
         A.lastModified AS lastModified \
         FROM caom2.Observation AS O \
         JOIN caom2.Plane AS P ON O.obsID = P.obsID \
         JOIN caom2.Artifact AS A ON A.planeID = P.planeID \
         WHERE O.collection = '{collection}' AND A.uri LIKE '{namespace}/%' \
         ORDER BY A.uri"
    ))
}

/// Artifact listing from the storage-inventory service for one namespace.
pub fn si_artifact_query(namespace: &str) -> Result<String, TapError> {
    let namespace = validate_identifier(namespace)?;
    Ok(format!(
        "SELECT uri AS uri, contentChecksum AS contentChecksum, \
         contentLength AS contentLength, contentType AS contentType, \
         contentLastModified AS lastModified \
         FROM inventory.Artifact \
         WHERE uri LIKE '{namespace}/%' \
         ORDER BY uri"
    ))
}

/// Per-artifact product-type indicators for one collection and namespace,
/// one CASE column per known product type.
pub fn caom_product_type_query(collection: &str, namespace: &str) -> Result<String, TapError> {
    let collection = validate_identifier(collection)?;
    let namespace = validate_identifier(namespace)?;

    let mut indicators = String::new();
    for (product_type, alias) in PRODUCT_TYPES {
        indicators.push_str(&format!(
            ", CASE WHEN A.productType = '{product_type}' THEN 1 END AS {alias}"
        ));
    }

    Ok(format!(
        "SELECT A.uri AS uri{indicators} \
         FROM caom2.Observation AS O \
         JOIN caom2.Plane AS P ON O.obsID = P.obsID \
         JOIN caom2.Artifact AS A ON A.planeID = P.planeID \
         WHERE O.collection = '{collection}' AND A.uri LIKE '{namespace}/%'"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caom_query_interpolates_collection_and_namespace() {
        let q = caom_artifact_query("CFHT", "cadc:CFHT").unwrap();
        assert!(q.contains("O.collection = 'CFHT'"));
        assert!(q.contains("A.uri LIKE 'cadc:CFHT/%'"));
        assert!(q.contains("ORDER BY A.uri"));
        assert!(q.contains("caom2.Artifact"));
    }

    #[test]
    fn si_query_targets_inventory_table() {
        let q = si_artifact_query("cadc:CFHT").unwrap();
        assert!(q.contains("FROM inventory.Artifact"));
        assert!(q.contains("contentLastModified AS lastModified"));
        assert!(q.contains("uri LIKE 'cadc:CFHT/%'"));
    }

    #[test]
    fn product_type_query_has_one_indicator_per_type() {
        let q = caom_product_type_query("CFHT", "cadc:CFHT").unwrap();
        for (product_type, alias) in PRODUCT_TYPES {
            assert!(q.contains(&format!("A.productType = '{product_type}'")));
            assert!(q.contains(&format!("AS {alias}")));
        }
    }

    #[test]
    fn quote_in_identifier_is_rejected() {
        assert!(caom_artifact_query("CFHT' OR 1=1 --", "cadc:CFHT").is_err());
        assert!(si_artifact_query("cadc:CFHT'").is_err());
        assert!(caom_product_type_query("CFHT", "bad namespace").is_err());
    }

    #[test]
    fn empty_identifier_is_rejected() {
        assert!(si_artifact_query("").is_err());
    }
}
