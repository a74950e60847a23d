#![allow(dead_code)]

use std::sync::Once;

static INIT: Once = Once::new();

pub const EQUIPMENT_CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Pump,10,5,100
Pump-2,Pump,20,6,110
Valve-1,Valve,15,6,105
";

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// A valid equipment CSV with `rows` pumps.
pub fn pump_csv(rows: usize) -> String {
    let mut csv = String::from("Type,Flowrate,Pressure,Temperature\n");
    for i in 0..rows {
        csv.push_str(&format!("Pump,{},{},{}\n", 10 + i, 5, 100));
    }
    csv
}

/// Every string shown with `Tj` across the pages of a rendered PDF.
pub fn pdf_text_lines(bytes: &[u8]) -> Vec<String> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let mut lines = Vec::new();
    for page_id in doc.get_pages().values() {
        let content = lopdf::content::Content::decode(&doc.get_page_content(*page_id).unwrap())
            .unwrap();
        for operation in content.operations {
            if operation.operator == "Tj" {
                if let Some(lopdf::Object::String(text, _)) = operation.operands.first() {
                    lines.push(String::from_utf8_lossy(text).into_owned());
                }
            }
        }
    }
    lines
}
