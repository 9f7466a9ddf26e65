use qdrant_e2e::domain::launch::{GRPC_PORT, HTTP_PORT};
use qdrant_e2e::domain::{ClusterHandle, ContainerHandle, HostBinding, LaunchConfig, ParamValue};

#[test]
fn test_default_params_are_exactly_the_base_set() {
    let params = LaunchConfig::default().to_launch_params("img:tag");

    assert_eq!(params.len(), 4);
    assert_eq!(params.get("image").and_then(ParamValue::as_str), Some("img:tag"));
    assert_eq!(params.get("detach").and_then(ParamValue::as_bool), Some(true));
    assert_eq!(params.get("remove").and_then(ParamValue::as_bool), Some(true));

    let ports = params.get("ports").and_then(ParamValue::as_map).unwrap();
    assert_eq!(ports.get(HTTP_PORT).and_then(ParamValue::as_binding), Some(&HostBinding::loopback()));
    assert_eq!(ports.get(GRPC_PORT).and_then(ParamValue::as_binding), Some(&HostBinding::loopback()));
}

#[test]
fn test_host_network_suppresses_ports() {
    let config = LaunchConfig {
        network_mode: Some("host".into()),
        ..Default::default()
    };

    assert!(!config.to_launch_params("img").contains_key("ports"));
}

#[test]
fn test_override_wins_over_field() {
    let config = LaunchConfig {
        remove: true,
        ..Default::default()
    }
    .param("remove", false);

    let params = config.to_launch_params("img");
    assert_eq!(params.get("remove").and_then(ParamValue::as_bool), Some(false));
}

#[test]
fn test_cluster_of_launched_handles() {
    let leader = ContainerHandle::new("c0", "127.0.0.1", "qdrant-0", 6333, Some(6334));
    let f1 = ContainerHandle::new("c1", "127.0.0.1", "qdrant-1", 6343, Some(6344));
    let f2 = ContainerHandle::new("c2", "127.0.0.1", "qdrant-2", 6353, None);

    let cluster = ClusterHandle::new(leader.clone(), vec![f1.clone(), f2.clone()], "net", "e2e");

    assert_eq!(cluster.all_nodes(), &[leader, f1, f2]);
    assert_eq!(cluster.all_nodes().len(), 1 + cluster.followers().len());
}

#[test]
fn test_params_serialize_like_runtime_kwargs() {
    let params = LaunchConfig::default()
        .name("qdrant-0")
        .mem_limit("512m")
        .to_launch_params("qdrant/qdrant:latest");

    let yaml = serde_yml::to_string(&params).unwrap();
    let value: serde_yml::Value = serde_yml::from_str(&yaml).unwrap();
    let field = |key: &str| value.get(key).and_then(serde_yml::Value::as_str);

    assert_eq!(field("name"), Some("qdrant-0"));
    assert_eq!(field("mem_limit"), Some("512m"));
    assert_eq!(field("image"), Some("qdrant/qdrant:latest"));

    let binding = value
        .get("ports")
        .and_then(|ports| ports.get(GRPC_PORT))
        .and_then(serde_yml::Value::as_sequence)
        .unwrap();
    assert_eq!(binding.len(), 2);
    assert_eq!(binding[0].as_str(), Some("127.0.0.1"));
    assert!(binding[1].is_null());
}
