//! Indirect carrier binding through declared accessors.

use pliant::testing::{AccessorSource, NamedExtension, RecordingExtension};
use pliant::{
    CallArg, CapabilityType, Carrier, DispatchError, MapRegistry, MethodDescriptor, Synthesizer,
};
use std::sync::Arc;

fn protocol_capability() -> CapabilityType {
    // `export(invoker)` has no direct carrier parameter; the invoker
    // exposes one through the canonical accessor.
    CapabilityType::builder("Protocol")
        .method(
            MethodDescriptor::builder("export")
                .source_param("Invoker", ["carrier"])
                .adaptive()
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn carrier_is_reached_through_the_accessor() {
    let registry = MapRegistry::builder()
        .register("Protocol", "grpc", NamedExtension::new("grpc"))
        .unwrap()
        .build();
    let synthesizer = Synthesizer::new(Arc::new(registry));
    let dispatcher = synthesizer.synthesize(&protocol_capability()).unwrap();

    let source =
        AccessorSource::new().with_carrier("carrier", Carrier::new().with_protocol("grpc"));
    let args = [CallArg::Source(&source)];

    // The derived key is `protocol`, the reserved key: the carrier's scheme
    // field decides.
    let outcome = dispatcher.invoke("export", &args).unwrap();
    assert_eq!(outcome.downcast::<String>().unwrap(), "grpc");
}

#[test]
fn absent_argument_fails_before_any_resolution() {
    let recorder = RecordingExtension::new();
    let registry = MapRegistry::builder()
        .register("Protocol", "grpc", recorder.clone())
        .unwrap()
        .build();
    let synthesizer = Synthesizer::new(Arc::new(registry)).default_name("Protocol", "grpc");
    let dispatcher = synthesizer.synthesize(&protocol_capability()).unwrap();

    let err = dispatcher.invoke("export", &[CallArg::Absent]).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidConfigCarrier { .. }));
    assert_eq!(recorder.call_count(), 0);
}

#[test]
fn accessor_yielding_nothing_fails_the_hop() {
    let recorder = RecordingExtension::new();
    let registry = MapRegistry::builder()
        .register("Protocol", "grpc", recorder.clone())
        .unwrap()
        .build();
    let synthesizer = Synthesizer::new(Arc::new(registry)).default_name("Protocol", "grpc");
    let dispatcher = synthesizer.synthesize(&protocol_capability()).unwrap();

    let source = AccessorSource::new();
    let err = dispatcher
        .invoke("export", &[CallArg::Source(&source)])
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidConfigCarrier { .. }));
    assert_eq!(recorder.call_count(), 0);
}

#[test]
fn no_reachable_carrier_fails_synthesis() {
    let capability = CapabilityType::builder("Protocol")
        .method(
            MethodDescriptor::builder("export")
                .value_param("Invoker")
                .adaptive()
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let registry = MapRegistry::builder().build();
    let err = Synthesizer::new(Arc::new(registry))
        .synthesize(&capability)
        .unwrap_err();
    assert!(matches!(
        err,
        pliant::SynthesisError::NoConfigCarrier { .. }
    ));
}
