//! Regional IPC enrichment: INE community labels -> boundary-file region names.

use crate::data::ine::SeriesPayload;
use crate::domain::RegionalVariation;

/// Substring present in every general-index series name ("Índice general").
pub const GENERAL_INDEX_MARKER: &str = "ndice general";
/// Substring present in every variation series name ("Variación ...").
pub const VARIATION_MARKER: &str = "Variaci";

/// INE community label -> `properties.name` in `spain_ccaa.geojson`.
pub const REGION_MAPPING: [(&str, &str); 19] = [
    ("Andalucía", "Andalucia"),
    ("Aragón", "Aragon"),
    ("Asturias, Principado de", "Asturias"),
    ("Balears, Illes", "Baleares"),
    ("Canarias", "Canarias"),
    ("Cantabria", "Cantabria"),
    ("Castilla y León", "Castilla-Leon"),
    ("Castilla - La Mancha", "Castilla-La Mancha"),
    ("Cataluña", "Cataluña"),
    ("Comunitat Valenciana", "Valencia"),
    ("Extremadura", "Extremadura"),
    ("Galicia", "Galicia"),
    ("Madrid, Comunidad de", "Madrid"),
    ("Murcia, Región de", "Murcia"),
    ("Navarra, Comunidad Foral de", "Navarra"),
    ("País Vasco", "Pais Vasco"),
    ("Rioja, La", "La Rioja"),
    ("Ceuta", "Ceuta"),
    ("Melilla", "Melilla"),
];

pub fn map_region(ine_label: &str) -> Option<&'static str> {
    REGION_MAPPING
        .iter()
        .find(|(label, _)| *label == ine_label)
        .map(|(_, name)| *name)
}

/// Keep general-index variation series of known communities, one row per
/// series in API order. Duplicates are kept.
pub fn extract_regional_variations(series: &[SeriesPayload]) -> Vec<RegionalVariation> {
    let mut out = Vec::new();
    for s in series {
        if !(s.nombre.contains(GENERAL_INDEX_MARKER) && s.nombre.contains(VARIATION_MARKER)) {
            continue;
        }

        let label = s.nombre.split('.').next().unwrap_or_default().trim();
        let Some(region) = map_region(label) else {
            continue;
        };

        let Some(variation) = s
            .data
            .first()
            .and_then(|p| p.valor.as_ref())
            .and_then(|v| v.as_f64())
        else {
            continue;
        };

        out.push(RegionalVariation {
            region: region.to_string(),
            variation,
        });
    }
    out
}
