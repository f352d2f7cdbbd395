//! Synthesis determinism across structurally identical descriptors.

use pliant::testing::NamedExtension;
use pliant::{
    CallArg, CapabilityType, Carrier, MapRegistry, MethodDescriptor, NamedInvocation, Synthesizer,
};
use std::sync::Arc;

fn capability() -> CapabilityType {
    CapabilityType::builder("Cluster")
        .namespace("rpc")
        .method(
            MethodDescriptor::builder("join")
                .carrier_param()
                .context_param()
                .adaptive_with_keys(["cluster", "protocol"])
                .build()
                .unwrap(),
        )
        .method(
            MethodDescriptor::builder("destroy")
                .carrier_param()
                .returns_nothing()
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn structurally_identical_descriptors_compare_equal() {
    assert_eq!(capability(), capability());
}

#[test]
fn identical_descriptors_resolve_identically() {
    let registry = Arc::new(
        MapRegistry::builder()
            .register("Cluster", "failover", NamedExtension::new("failover"))
            .unwrap()
            .register("Cluster", "dubbo", NamedExtension::new("dubbo"))
            .unwrap()
            .build(),
    );
    let synthesizer = Synthesizer::new(registry).default_name("rpc::Cluster", "failover");

    let first = synthesizer.synthesize(&capability()).unwrap();
    let second = synthesizer.synthesize(&capability()).unwrap();

    let invocation = NamedInvocation::new("invoke");
    let carriers = [
        Carrier::new(),
        Carrier::new().with_parameter("cluster", "dubbo"),
        Carrier::new().with_protocol("dubbo"),
        Carrier::new().with_operation_parameter("invoke", "cluster", "dubbo"),
    ];

    for carrier in &carriers {
        let args = [CallArg::Carrier(carrier), CallArg::Context(&invocation)];
        assert_eq!(
            first.resolve_name("join", &args).unwrap(),
            second.resolve_name("join", &args).unwrap(),
        );
    }
}
