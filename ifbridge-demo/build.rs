use ifbridge_codegen::GeneratorConfig;

fn main() {
    let config = GeneratorConfig::default().with_interface_path("com.ifbridge.demo");
    if let Err(err) = ifbridge_codegen::build::generate_to_out_dir("schema/hmi_api.xml", &config) {
        panic!("Failed to generate bridges: {err}");
    }
}
