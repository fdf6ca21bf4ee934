pub mod text_decoder;
