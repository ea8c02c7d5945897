pub mod text;
pub mod validated_json;
