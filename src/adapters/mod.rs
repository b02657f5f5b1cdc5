pub mod camera;
pub mod http;
pub mod onnx;
