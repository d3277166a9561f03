//! Generates the `PipeStepProcessor` gRPC client and server.
//!
//! Messages are hand-written prost types in `src/proto/mod.rs`, so the
//! service is described here with `tonic_build::manual` and no `protoc`
//! is required.

fn main() {
    let method = |name: &str, route: &str, input: &str, output: &str| {
        tonic_build::manual::Method::builder()
            .name(name)
            .route_name(route)
            .input_type(format!("crate::proto::{input}"))
            .output_type(format!("crate::proto::{output}"))
            .codec_path("tonic::codec::ProstCodec")
            .build()
    };

    let service = tonic_build::manual::Service::builder()
        .name("PipeStepProcessor")
        .package("pipestream.module")
        .method(method(
            "process_data",
            "ProcessData",
            "ModuleProcessRequest",
            "ModuleProcessResponse",
        ))
        .method(method(
            "test_process_data",
            "TestProcessData",
            "ModuleProcessRequest",
            "ModuleProcessResponse",
        ))
        .method(method(
            "get_service_registration",
            "GetServiceRegistration",
            "RegistrationRequest",
            "ServiceRegistrationMetadata",
        ))
        .build();

    tonic_build::manual::Builder::new()
        .build_client(true)
        .build_server(true)
        .compile(&[service]);

    println!("cargo:rerun-if-changed=build.rs");
}
