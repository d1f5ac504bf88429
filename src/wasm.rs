use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn render_exam_paper(json: &str) -> Result<Vec<u8>, JsValue> {
    crate::render_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Download name for a paper payload, `<subject>_<year>_Paper.pdf`.
#[wasm_bindgen]
pub fn exam_paper_file_name(json: &str) -> Result<String, JsValue> {
    crate::ExamPaper::from_json(json)
        .map(|paper| paper.file_name())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
