//! Counseling medication module generator
//!
//! Turns the extracted counseling-assessment JSON into an ES module that the
//! web front end imports directly.

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write;

const TITLE: &str = "Borang Penilaian Kaunseling";
const SUBTITLE: &str = "Pegawai Farmasi";
const SOURCE: &str = "borang-penilaian-kemahiran-kaunseling-pegawai-farmasi.pdf";

/// One medication from the counseling assessment form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounselingMedication {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pharmacological_group: String,
    #[serde(default)]
    pub indication: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub method_of_administration: String,
    #[serde(default)]
    pub special_considerations: Map<String, Value>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub others: CounselingOthers,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounselingOthers {
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub other_points: String,
}

/// Quoted, escaped JS string literal
fn js_string(text: &str) -> Result<String> {
    Ok(serde_json::to_string(text)?)
}

/// Array literal with `", "` between items
fn js_array<T: Serialize>(items: &[T]) -> Result<String> {
    let items = items
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", items.join(", ")))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Object literal for `specialConsiderations`: input key order, blanks dropped,
/// `other` kept as an array
fn special_considerations(map: &Map<String, Value>) -> Result<String> {
    let mut lines = Vec::new();

    for (key, value) in map {
        if is_blank(value) {
            continue;
        }
        let literal = match value {
            Value::Array(items) if key == "other" => js_array(items)?,
            Value::String(s) => js_string(s)?,
            other => js_string(&other.to_string())?,
        };
        lines.push(format!("        {key}: {literal}"));
    }

    if lines.is_empty() {
        return Ok("{}".to_string());
    }
    Ok(format!("{{\n{}\n      }}", lines.join(",\n")))
}

fn write_medication(js: &mut String, med: &CounselingMedication) -> Result<()> {
    // Writing to a String cannot fail
    let _ = writeln!(js, "  {{");
    let _ = writeln!(js, "    id: {},", js_string(&med.id)?);
    let _ = writeln!(js, "    name: {},", js_string(&med.name)?);
    let _ = writeln!(
        js,
        "    pharmacologicalGroup: {},",
        js_string(&med.pharmacological_group)?
    );
    let _ = writeln!(js, "    indication: {},", js_string(&med.indication)?);
    let _ = writeln!(js, "    dosage: {},", js_string(&med.dosage)?);
    let _ = writeln!(
        js,
        "    methodOfAdministration: {},",
        js_string(&med.method_of_administration)?
    );
    let _ = writeln!(
        js,
        "    specialConsiderations: {},",
        special_considerations(&med.special_considerations)?
    );
    let _ = writeln!(
        js,
        "    sideEffects: {},",
        js_array(&med.side_effects)?
    );
    let _ = writeln!(
        js,
        "    others: {{\"storage\": {}, \"other_points\": {}}}",
        js_string(&med.others.storage)?,
        js_string(&med.others.other_points)?
    );
    let _ = writeln!(js, "  }},");
    Ok(())
}

/// Render the complete module
pub fn generate_counseling_js(
    medications: &[CounselingMedication],
    last_updated: NaiveDate,
) -> Result<String> {
    let mut js = String::new();
    js.push_str("// Counseling Medications Data\n");
    let _ = writeln!(js, "// Extracted from: {SOURCE}\n");
    js.push_str("export const COUNSELING_MEDICATIONS = [\n");

    for med in medications {
        write_medication(&mut js, med)?;
    }

    js.push_str("];\n\n");
    js.push_str("export const COUNSELING_METADATA = {\n");
    let _ = writeln!(js, "  title: {},", js_string(TITLE)?);
    let _ = writeln!(js, "  subtitle: {},", js_string(SUBTITLE)?);
    let _ = writeln!(js, "  totalMedications: {},", medications.len());
    let _ = writeln!(js, "  lastUpdated: \"{}\",", last_updated.format("%Y-%m-%d"));
    let _ = writeln!(js, "  source: {}", js_string(SOURCE)?);
    js.push_str("};\n");

    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn special(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("say \"hi\"\nnow\\").unwrap(), r#""say \"hi\"\nnow\\""#);
    }

    #[test]
    fn test_special_considerations_order_and_blanks() {
        let map = special(json!({
            "pregnancy": "Avoid",
            "renal": "",
            "other": ["Take with food", "Avoid alcohol"],
            "elderly": "Reduce dose"
        }));
        assert_eq!(
            special_considerations(&map).unwrap(),
            "{\n        pregnancy: \"Avoid\",\n        other: [\"Take with food\", \"Avoid alcohol\"],\n        elderly: \"Reduce dose\"\n      }"
        );
    }

    #[test]
    fn test_js_array_separator() {
        assert_eq!(js_array(&["Nausea", "Tremor"][..]).unwrap(), r#"["Nausea", "Tremor"]"#);
        assert_eq!(js_array::<String>(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_special_considerations_empty() {
        assert_eq!(special_considerations(&Map::new()).unwrap(), "{}");
        let map = special(json!({"renal": "", "other": []}));
        assert_eq!(special_considerations(&map).unwrap(), "{}");
    }

    #[test]
    fn test_generate_module() {
        let med = CounselingMedication {
            id: "c-1".to_string(),
            name: "Metformin".to_string(),
            pharmacological_group: "Biguanide".to_string(),
            indication: "Type 2 diabetes".to_string(),
            dosage: "500mg BD".to_string(),
            method_of_administration: "Oral, with meals".to_string(),
            special_considerations: Map::new(),
            side_effects: vec!["Nausea".to_string()],
            others: CounselingOthers {
                storage: "Room temperature".to_string(),
                other_points: String::new(),
            },
        };

        let js = generate_counseling_js(&[med], date()).unwrap();
        let expected = "\
// Counseling Medications Data
// Extracted from: borang-penilaian-kemahiran-kaunseling-pegawai-farmasi.pdf

export const COUNSELING_MEDICATIONS = [
  {
    id: \"c-1\",
    name: \"Metformin\",
    pharmacologicalGroup: \"Biguanide\",
    indication: \"Type 2 diabetes\",
    dosage: \"500mg BD\",
    methodOfAdministration: \"Oral, with meals\",
    specialConsiderations: {},
    sideEffects: [\"Nausea\"],
    others: {\"storage\": \"Room temperature\", \"other_points\": \"\"}
  },
];

export const COUNSELING_METADATA = {
  title: \"Borang Penilaian Kaunseling\",
  subtitle: \"Pegawai Farmasi\",
  totalMedications: 1,
  lastUpdated: \"2026-03-09\",
  source: \"borang-penilaian-kemahiran-kaunseling-pegawai-farmasi.pdf\"
};
";
        assert_eq!(js, expected);
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let meds: Vec<CounselingMedication> =
            serde_json::from_value(json!([{"id": "c-2", "name": "Insulin"}])).unwrap();
        assert_eq!(meds[0].others, CounselingOthers::default());
        assert!(meds[0].side_effects.is_empty());
    }
}
