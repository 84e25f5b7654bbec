//! Full producer/consumer passes through the engine, checking generated
//! files and the telemetry report shape.

use std::path::PathBuf;

use fakesmith::cache::content_signature;
use fakesmith::core::{FunctionModel, ParameterModel, TypeDescriptor, TypeParameterModel};
use fakesmith::testing;
use fakesmith::{Engine, GeneratorConfig, InterfaceModel};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_source(dir: &TempDir, name: &str, content: &str) -> (PathBuf, String) {
    let path = dir.path().join("src").join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    (path, content_signature(content.as_bytes()))
}

fn service_models(dir: &TempDir, count: usize) -> Vec<InterfaceModel> {
    (0..count)
        .map(|i| {
            let (path, sig) = write_source(
                dir,
                &format!("service{i}.rs"),
                &format!("trait Service{i} {{ fn ping(&self); }}"),
            );
            testing::interface(&format!("Service{i}"))
                .package("app::services")
                .function(FunctionModel::new("ping", TypeDescriptor::unit()))
                .source(&path, &sig)
                .analysis_time(3_000)
                .build()
        })
        .collect()
}

#[test]
fn producer_pass_writes_sources_and_cache() {
    init_logs();
    let dir = TempDir::new().unwrap();
    let config = GeneratorConfig::producer(
        dir.path().join("generated"),
        dir.path().join("cache/metadata.json"),
    );
    let engine = Engine::new(config);

    let models = service_models(&dir, 3);
    let summary = engine.run(&models).unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.generated, 3);
    assert_eq!(summary.cache_hits, 0);
    assert_eq!(summary.written_files.len(), 3);
    assert!(dir.path().join("generated/fake_service0.rs").exists());
    assert!(dir.path().join("cache/metadata.json").exists());
}

#[test]
fn fully_cached_consumer_pass_renders_single_line_summary() {
    init_logs();
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("cache/metadata.json");
    let models = service_models(&dir, 10);

    let producer = Engine::new(GeneratorConfig::producer(
        dir.path().join("out_a"),
        cache_path.clone(),
    ));
    producer.run(&models).unwrap();

    let consumer = Engine::new(GeneratorConfig::consumer(
        dir.path().join("out_b"),
        cache_path,
    ));
    let summary = consumer.run(&models).unwrap();

    assert_eq!(summary.cache_hits, 10);
    assert_eq!(summary.generated, 0);
    assert_eq!(summary.report, "fakesmith: 10 fakes (all cached)");
    // Regeneration still happened for the second target directory.
    assert!(dir.path().join("out_b/fake_service9.rs").exists());
}

#[test]
fn editing_one_source_forces_full_reanalysis() {
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("metadata.json");
    let mut models = service_models(&dir, 4);

    let producer = Engine::new(GeneratorConfig::producer(
        dir.path().join("out_a"),
        cache_path.clone(),
    ));
    producer.run(&models).unwrap();

    // Edit one source; the frontend would hand us a fresh signature.
    let edited = models[2].location.file.clone();
    let new_content = "trait Service2 { fn ping(&self); fn pong(&self); }";
    std::fs::write(&edited, new_content).unwrap();
    models[2].source_signature = content_signature(new_content.as_bytes());

    let consumer = Engine::new(GeneratorConfig::consumer(
        dir.path().join("out_b"),
        cache_path,
    ));
    let summary = consumer.run(&models).unwrap();

    // Whole-file invalidation: no entry survives a single stale signature.
    assert_eq!(summary.cache_hits, 0);
    assert_eq!(summary.generated, 4);
    assert!(summary.report.contains("(4 generated, 0 cached)"));
}

#[test]
fn duplicate_models_in_a_cached_pass_do_not_panic() {
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("metadata.json");
    let models = service_models(&dir, 1);

    let producer = Engine::new(GeneratorConfig::producer(
        dir.path().join("out_a"),
        cache_path.clone(),
    ));
    producer.run(&models).unwrap();

    // Two copies of the same model: one telemetry record, two cache hits.
    let doubled = vec![models[0].clone(), models[0].clone()];
    let consumer = Engine::new(GeneratorConfig::consumer(
        dir.path().join("out_b"),
        cache_path,
    ));
    let summary = consumer.run(&doubled).unwrap();

    assert_eq!(summary.cache_hits, 2);
    assert_eq!(summary.generated, 0);
    assert!(summary.report.contains("(0 generated, 2 cached)"));
}

#[test]
fn generated_file_matches_expected_shape() {
    let dir = TempDir::new().unwrap();
    let (path, sig) = write_source(&dir, "user_service.rs", "trait UserService { ... }");
    let model = testing::sample_service_model(&path, &sig);

    let engine = Engine::new(GeneratorConfig {
        output_dir: dir.path().join("generated"),
        ..GeneratorConfig::default()
    });
    engine.run(std::slice::from_ref(&model)).unwrap();

    let body =
        std::fs::read_to_string(dir.path().join("generated/fake_user_service.rs")).unwrap();
    assert!(body.starts_with("// Generated by fakesmith. Do not edit.\n"));
    assert!(body.contains("use fakesmith::runtime::InvocationCounter;"));
    // Nullable-shaped return defaults to the null literal.
    assert!(body.contains("fetch_behavior: Box::new(|_id| None),"));
    assert!(body.contains("pub fetch_calls: InvocationCounter,"));
    assert!(body.contains("self.fetch_calls.increment();"));
    assert!(body.contains("pub fn fake_user_service("));
    assert!(body.contains("pub fn on_fetch(&mut self,"));
    assert!(body.contains("pub fn endpoint_returns(&mut self, value: String)"));
}

#[test]
fn method_level_generic_gets_erased_slot_with_cast_back() {
    let dir = TempDir::new().unwrap();
    let (path, sig) = write_source(&dir, "mapper.rs", "trait Mapper { ... }");

    let mut identity = FunctionModel::new("identity", TypeDescriptor::parameter("T"));
    identity.type_parameters = vec![TypeParameterModel::new("T")];
    identity.parameters = vec![ParameterModel::new("value", TypeDescriptor::parameter("T"))];
    let model = testing::interface("Mapper")
        .function(identity)
        .source(&path, &sig)
        .build();

    let engine = Engine::new(GeneratorConfig {
        output_dir: dir.path().join("generated"),
        ..GeneratorConfig::default()
    });
    engine.run(&[model]).unwrap();

    let body = std::fs::read_to_string(dir.path().join("generated/fake_mapper.rs")).unwrap();
    assert!(body.contains("fn identity<T: 'static>(&self, value: T) -> T {"));
    assert!(body.contains("Box<dyn std::any::Any>"));
    assert!(body.contains(".downcast::<T>()"));
}

#[test]
fn zero_member_interface_generates_complete_file() {
    let dir = TempDir::new().unwrap();
    let (path, sig) = write_source(&dir, "marker.rs", "trait Marker {}");
    let model = testing::interface("Marker").source(&path, &sig).build();

    let engine = Engine::new(GeneratorConfig {
        output_dir: dir.path().join("generated"),
        ..GeneratorConfig::default()
    });
    engine.run(&[model]).unwrap();

    let body = std::fs::read_to_string(dir.path().join("generated/fake_marker.rs")).unwrap();
    assert!(body.contains("pub struct FakeMarker {"));
    assert!(body.contains("pub struct MarkerConfig {"));
    assert!(body.contains("pub fn fake_marker("));
}

#[test]
fn unwritable_output_directory_is_fatal_with_path() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let engine = Engine::new(GeneratorConfig {
        output_dir: blocker.clone(),
        ..GeneratorConfig::default()
    });
    let err = engine.run(&[testing::interface("X").build()]).unwrap_err();
    assert!(err.to_string().contains(&blocker.display().to_string()));
}
