//! Integration tests for rendering views to DOT

use ci_graph::resolve::label_capacity;
use ci_graph::{
    render, render_with_options, GraphKind, LinePosition, Record, RenderError, RenderOptions,
    TemplateNode, ViewDefinition, ViewKind,
};
use pretty_assertions::assert_eq;

fn ci(guid: &str, key_name: &str) -> Record {
    Record::new().with("guid", guid).with("key_name", key_name)
}

fn node(data_name: &str) -> TemplateNode {
    TemplateNode::new(GraphKind::Node)
        .with_data_name(data_name)
        .with_label_tokens(["key_name"])
}

fn cluster(data_name: &str) -> TemplateNode {
    TemplateNode::new(GraphKind::Subgraph)
        .with_data_name(data_name)
        .with_label_tokens(["key_name"])
}

fn line(data_name: &str) -> TemplateNode {
    TemplateNode::new(GraphKind::Line)
        .with_data_name(data_name)
        .with_label_tokens(["key_name"])
        .with_line_fields("from", "to")
        .with_line_position(LinePosition::Middle)
}

fn link(guid: &str, from: &str, to: &str) -> Record {
    ci(guid, "calls").with("from", from).with("to", to)
}

/// Edge statements of a document, in output order
fn edge_lines(dot: &str) -> Vec<&str> {
    dot.lines().filter(|l| l.contains(" -> ") && l.contains("lhead=")).collect()
}

#[test]
fn test_end_to_end_children_and_edge() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("").with_child(node("children")).with_child(line("links")),
    );
    let root = ci("R1", "system")
        .with("children", vec![ci("C1", "c1"), ci("C2", "c2")])
        .with("links", vec![link("L1", "C1", "C2")]);

    let dot = render(&view, &[root]).unwrap();

    insta::assert_snapshot!(dot, @r##"
    digraph G {
    rankdir=TB;edge[minlen=3];compound=true;
    subgraph cluster_R1 {
    id=R1;fontsize=20;label="system";tooltip="system";penwidth=1;color=black;
    R1[penwidth=0;width=0;height=0;label=""];
    C1[id=C1;fontsize=20;shape="ellipse";width=4.0;label="c1";tooltip="c1";penwidth=1;color=black;];
    C2[id=C2;fontsize=20;shape="ellipse";width=4.0;label="c2";tooltip="c2";penwidth=1;color=black;];
    }
    C1 -> C2[id="L1";fontsize=12.00;label="calls";tooltip="calls";lhead=cluster_C2;ltail=cluster_C1;arrowhead=normal;penwidth=1;color=black;];
    }
    "##);

    let edges = edge_lines(&dot);
    assert_eq!(edges.len(), 1);
    let first_edge = dot.find("C1 -> C2").unwrap();
    assert!(dot.find("C1[id=C1").unwrap() < first_edge);
    assert!(dot.find("C2[id=C2").unwrap() < first_edge);
}

#[test]
fn test_group_view_document() {
    let view = ViewDefinition::new(
        ViewKind::Group,
        TemplateNode::new(GraphKind::Image)
            .with_label_tokens(["key_name"])
            .with_ci_type("app")
            .with_node_group("apps")
            .with_child(
                TemplateNode::new(GraphKind::Image)
                    .with_data_name("hosts")
                    .with_label_tokens(["key_name"])
                    .with_ci_type("host")
                    .with_node_group("hosts"),
            ),
    )
    .with_node_groups("\"apps\"->\"hosts\"");
    let options = RenderOptions::new()
        .with_image("app", "app.png")
        .with_image("host", "host.png");
    let root = ci("A1", "billing").with("hosts", vec![ci("H1", "web01")]);

    let dot = render_with_options(&view, &[root], &options).unwrap();

    let expected = concat!(
        "digraph G {\n",
        "rankdir=TB;edge[minlen=3];compound=true;\n",
        "Node [color=\"transparent\";fixedsize=\"true\";width=\"1.1\";height=\"1.1\";shape=box];\n",
        "{\nnode [shape=plaintext];\n\"apps\"->\"hosts\";\n}\n",
        "{rank=same; \"apps\"; A1[id=\"A1\";label=\"billing\";fontsize=14;penwidth=1;width=2;image=\"app.png\";labelloc=\"b\";shape=\"box\"]}\n",
        "{rank=same;\"hosts\"; H1[id=H1;fontsize=14;width=1.1;height=1.1;tooltip=\"web01\";fixedsize=true;shape=\"box\";labelloc=\"b\";label=\"web01\";image=\"host.png\";color=\"transparent\";penwidth=1;]}\n",
        "A1 -> H1 [arrowsize=0;style=invis];\n",
        "}\n",
    );
    assert_eq!(dot, expected);
}

#[test]
fn test_record_reachable_by_many_paths_declared_once() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("").with_child(cluster("zones").with_child(node("hosts"))),
    );
    let shared = ci("H0", "shared");
    let roots = vec![
        ci("S1", "billing").with(
            "zones",
            vec![
                ci("Z1", "dc-1").with("hosts", vec![shared.clone(), ci("H1", "web01")]),
                ci("Z2", "dc-2").with("hosts", vec![shared.clone()]),
            ],
        ),
        ci("S2", "crm").with("zones", vec![ci("Z1", "dc-1"), ci("Z3", "dc-3").with("hosts", vec![shared])]),
        ci("S1", "billing"),
    ];

    let dot = render(&view, &roots).unwrap();

    assert_eq!(dot.matches("H0[id=H0;").count(), 1);
    assert_eq!(dot.matches("subgraph cluster_Z1 ").count(), 1);
    assert_eq!(dot.matches("subgraph cluster_S1 ").count(), 1);
    assert!(dot.contains("subgraph cluster_Z3 "));
}

#[test]
fn test_edges_only_reference_declared_identifiers() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("").with_child(node("children")).with_child(line("links")),
    );
    let roots = vec![
        ci("R1", "a")
            .with("children", vec![ci("C1", "c1")])
            // C2 is only declared by the second root, after this edge was queued
            .with("links", vec![link("L1", "C1", "C2"), link("L2", "C1", "GHOST")]),
        ci("R2", "b").with("children", vec![ci("C2", "c2")]),
    ];

    let dot = render(&view, &roots).unwrap();
    let edges = edge_lines(&dot);
    assert_eq!(edges.len(), 1);
    assert!(edges[0].starts_with("C1 -> C2["));

    for edge in edges {
        let (head, rest) = edge.split_once(" -> ").unwrap();
        let tail = &rest[..rest.find('[').unwrap()];
        let declarations = &dot[..dot.find(edge).unwrap()];
        assert!(declarations.contains(&format!("{}[id={}", head, head)));
        assert!(declarations.contains(&format!("{}[id={}", tail, tail)));
    }
}

#[test]
fn test_ungated_edges_are_emitted() {
    let view = ViewDefinition::new(ViewKind::Subgraph, cluster("").with_child(line("links")));
    let root = ci("R1", "a").with("links", vec![link("L1", "X", "Y")]);
    let options = RenderOptions::new().with_edge_gating(false);

    let dot = render_with_options(&view, &[root.clone()], &options).unwrap();
    assert!(dot.contains("X -> Y[id=\"L1\";"));

    let gated = render(&view, &[root]).unwrap();
    assert!(!gated.contains("X -> Y"));
}

#[test]
fn test_font_shrinks_with_depth() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("").with_child(cluster("zones").with_child(cluster("racks").with_child(node("hosts")))),
    );
    let root = ci("S1", "billing").with(
        "zones",
        vec![ci("Z1", "dc-1").with(
            "racks",
            vec![ci("K1", "rack-1").with("hosts", vec![ci("H1", "web01")])],
        )],
    );

    let dot = render(&view, &[root]).unwrap();

    // max depth 3: step (20 - 14) / 2 = 3 per level
    assert!(dot.contains("id=S1;fontsize=20;"));
    assert!(dot.contains("id=Z1;fontsize=17;"));
    assert!(dot.contains("id=K1;fontsize=14;"));
    assert!(dot.contains("H1[id=H1;fontsize=11;"));
}

#[test]
fn test_shallow_template_keeps_font_constant() {
    let view = ViewDefinition::new(ViewKind::Subgraph, cluster("").with_child(node("hosts")));
    let root = ci("S1", "billing").with("hosts", vec![ci("H1", "web01")]);

    let dot = render(&view, &[root]).unwrap();
    assert!(dot.contains("id=S1;fontsize=20;"));
    assert!(dot.contains("H1[id=H1;fontsize=20;"));
}

#[test]
fn test_node_label_truncation_boundary() {
    let view = ViewDefinition::new(ViewKind::Subgraph, cluster("").with_child(node("hosts")));
    let cap = label_capacity("ellipse", 4.0, 20.0);
    let exact = "a".repeat(cap);
    let over = "b".repeat(cap + 1);
    let root = ci("S1", "billing").with("hosts", vec![ci("H1", &exact), ci("H2", &over)]);

    let dot = render(&view, &[root]).unwrap();

    assert!(dot.contains(&format!("label=\"{}\";tooltip=\"{}\"", exact, exact)));
    let cut = format!("{}...", "b".repeat(cap - 3));
    assert!(dot.contains(&format!("label=\"{}\";tooltip=\"{}\"", cut, over)));
}

#[test]
fn test_grid_for_large_sibling_groups() {
    let view = ViewDefinition::new(ViewKind::Subgraph, cluster("").with_child(node("hosts")));
    let hosts: Vec<Record> = (1..=5).map(|i| ci(&format!("H{}", i), "h")).collect();
    let dot = render(&view, &[ci("S1", "billing").with("hosts", hosts)]).unwrap();

    assert!(dot.contains(
        "{rank=same;H1;H2;H3;}\n{rank=same;H4;H5;}\nH1->H4[penwidth=0;minlen=1;arrowsize=0];\n"
    ));
    assert_eq!(dot.matches("[penwidth=0;minlen=1;arrowsize=0]").count(), 1);

    let hosts: Vec<Record> = (1..=3).map(|i| ci(&format!("H{}", i), "h")).collect();
    let dot = render(&view, &[ci("S1", "billing").with("hosts", hosts)]).unwrap();
    assert!(!dot.contains("{rank=same;"));
}

#[test]
fn test_version_support_style_mapping() {
    let styled = node("hosts").with_styles("env", r#"{"prod": "color=red;penwidth=2;"}"#);
    let view = ViewDefinition::new(ViewKind::Subgraph, cluster("").with_child(styled));
    let root = ci("S1", "billing")
        .with("confirm_time", "2024-01-01")
        .with(
            "hosts",
            vec![
                ci("H1", "web01").with("env", "prod").with("confirm_time", ""),
                ci("H2", "web02")
                    .with("env", "prod")
                    .with("confirm_time", "2023-06-01")
                    .with("update_time", "2024-02-01"),
            ],
        );

    let options = RenderOptions::new().with_version_support(true);
    let dot = render_with_options(&view, &[root.clone()], &options).unwrap();
    assert!(dot.contains("tooltip=\"web01\";color=red;penwidth=2;];"));
    assert!(dot.contains("tooltip=\"web02\";penwidth=1;color=black;];"));

    let plain = render(&view, &[root]).unwrap();
    assert!(plain.contains("tooltip=\"web01\";penwidth=1;color=black;];"));
}

#[test]
fn test_filter_skips_records() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("").with_child(node("hosts").with_filter("state", ["online"])),
    );
    let root = ci("S1", "billing").with(
        "hosts",
        vec![
            ci("H1", "web01").with("state", "online"),
            ci("H2", "web02").with("state", "retired"),
        ],
    );

    let dot = render(&view, &[root]).unwrap();
    assert!(dot.contains("H1[id=H1;"));
    assert!(!dot.contains("H2[id=H2;"));
}

#[test]
fn test_malformed_data_degrades() {
    let mut broken = node("hosts");
    broken.display_expression = "not json".to_string();
    broken.shapes = "{oops".to_string();
    broken.shape_field = "kind".to_string();
    let view = ViewDefinition::new(ViewKind::Subgraph, cluster("").with_child(broken));
    let root = ci("S1", "billing").with("hosts", vec![ci("H1", "web01"), ci("H2", "web02")]);
    let also_bad = ci("S2", "crm").with("hosts", "not a list");

    let dot = render(&view, &[root, also_bad]).unwrap();
    assert!(dot.contains("H1[id=H1;fontsize=20;shape=\"ellipse\";width=4.0;label=\"\";tooltip=\"\";"));
    assert!(dot.contains("subgraph cluster_S2 "));
}

#[test]
fn test_edge_children_declared_before_edges() {
    let endpoint = TemplateNode::new(GraphKind::Node)
        .with_data_name("endpoints")
        .with_label_tokens(["key_name"]);
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("")
            .with_child(node("children"))
            .with_child(line("links").with_child(endpoint)),
    );
    let root = ci("R1", "system")
        .with("children", vec![ci("C1", "c1")])
        .with(
            "links",
            vec![link("L1", "E1", "C1").with("endpoints", vec![ci("E1", "gateway")])],
        );

    let dot = render(&view, &[root]).unwrap();
    let decl = dot.find("E1[id=E1;").expect("edge child declared");
    let edge = dot.find("E1 -> C1[").expect("edge emitted");
    assert!(decl < edge);
}

#[test]
fn test_edge_endpoint_declared_by_later_edge_children() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("")
            .with_child(node("children"))
            .with_child(line("first"))
            .with_child(line("second").with_child(node("ends"))),
    );
    let root = ci("R1", "system")
        .with("children", vec![ci("C1", "c1")])
        .with("first", vec![link("L1", "C1", "E2")])
        .with(
            "second",
            vec![link("L2", "E2", "C1").with("ends", vec![ci("E2", "gateway")])],
        );

    let dot = render(&view, &[root]).unwrap();
    assert!(dot.contains("E2[id=E2;"));
    let edges = edge_lines(&dot);
    assert_eq!(edges.len(), 2);
    assert!(edges[0].starts_with("C1 -> E2[id=\"L1\";"));
    assert!(edges[1].starts_with("E2 -> C1[id=\"L2\";"));
}

#[test]
fn test_group_connector_skips_undeclared_parent() {
    let endpoint = TemplateNode::new(GraphKind::Image)
        .with_data_name("endpoints")
        .with_label_tokens(["key_name"])
        .with_node_group("endpoints");
    let view = ViewDefinition::new(
        ViewKind::Group,
        TemplateNode::new(GraphKind::Image)
            .with_label_tokens(["key_name"])
            .with_node_group("apps")
            .with_child(line("links").with_child(endpoint)),
    );
    let root = ci("A1", "billing").with(
        "links",
        vec![link("L1", "A1", "E1").with("endpoints", vec![ci("E1", "gateway")])],
    );

    let dot = render(&view, &[root]).unwrap();
    assert!(dot.contains("E1[id=E1;"));
    assert!(!dot.contains("L1 -> E1"));
    assert!(dot.contains("A1 -> E1[id=\"L1\";"));
}

#[test]
fn test_version_support_gray_borders() {
    let view = ViewDefinition::new(
        ViewKind::Group,
        TemplateNode::new(GraphKind::Image)
            .with_label_tokens(["key_name"])
            .with_node_group("apps")
            .with_child(
                TemplateNode::new(GraphKind::Image)
                    .with_data_name("hosts")
                    .with_label_tokens(["key_name"])
                    .with_node_group("hosts"),
            ),
    );
    let root = || ci("A1", "billing").with("hosts", vec![ci("H1", "web01")]);

    let options = RenderOptions::new().with_version_support(true);
    let dot = render_with_options(&view, &[root()], &options).unwrap();
    assert!(dot.contains("shape=\"box\";color=\"#dddddd\"]}\n"));
    assert!(dot.contains("image=\"\";color=\"#dddddd\";penwidth=1;]}\n"));

    let dot = render(&view, &[root()]).unwrap();
    assert!(!dot.contains("#dddddd"));
    assert!(dot.contains("shape=\"box\"]}\n"));
    assert!(dot.contains("image=\"\";color=\"transparent\";penwidth=1;]}\n"));
}

#[test]
fn test_guids_outside_plain_names_are_quoted() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("").with_child(node("children")).with_child(line("links")),
    );
    let root = ci("0045_00001", "system")
        .with("children", vec![ci("web-01", "w"), ci("db01", "d")])
        .with("links", vec![link("L1", "web-01", "db01")]);

    let dot = render(&view, &[root]).unwrap();
    assert!(dot.contains("subgraph cluster_0045_00001 {\nid=\"0045_00001\";"));
    assert!(dot.contains("\"0045_00001\"[penwidth=0;"));
    assert!(dot.contains("\"web-01\"[id=\"web-01\";"));
    assert!(dot.contains(
        "\"web-01\" -> db01[id=\"L1\";fontsize=12.00;label=\"calls\";tooltip=\"calls\";lhead=cluster_db01;ltail=\"cluster_web-01\";"
    ));
}

#[test]
fn test_leaf_edges_use_decoration_arrow() {
    let hosts = node("hosts")
        .with_line_fields("guid", "runs_on")
        .with_child(node("disks"));
    let view = ViewDefinition::new(ViewKind::Subgraph, cluster("").with_child(hosts));
    let root = ci("S1", "billing").with(
        "hosts",
        vec![
            ci("H1", "web01").with("runs_on", "H2").with("disks", vec![ci("D1", "sda")]),
            ci("H2", "vm-host"),
        ],
    );

    let dot = render(&view, &[root]).unwrap();
    assert_eq!(dot.matches("D1[id=D1;").count(), 1);
    assert!(dot.contains(
        "H1 -> H2[id=\"H1\";fontsize=4.80;lhead=cluster_H2;ltail=cluster_H1;arrowhead=icurve];\n"
    ));
}

#[test]
fn test_nested_line_templates_are_flushed() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("")
            .with_child(node("children"))
            .with_child(line("links").with_child(line("sublinks"))),
    );
    let root = ci("R1", "system")
        .with("children", vec![ci("C1", "c1"), ci("C2", "c2"), ci("C3", "c3")])
        .with(
            "links",
            vec![link("L1", "C1", "C2").with("sublinks", vec![link("L2", "C2", "C3")])],
        );

    let dot = render(&view, &[root]).unwrap();
    let edges = edge_lines(&dot);
    assert_eq!(edges.len(), 2);
    assert!(edges[0].starts_with("C1 -> C2["));
    assert!(edges[1].starts_with("C2 -> C3["));
}

#[test]
fn test_head_and_tail_label_positions() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("")
            .with_child(node("children"))
            .with_child(line("heads").with_line_position(LinePosition::Head))
            .with_child(line("tails").with_line_position(LinePosition::Tail)),
    );
    let root = ci("R1", "system")
        .with("children", vec![ci("C1", "c1"), ci("C2", "c2")])
        .with("heads", vec![link("L1", "C1", "C2")])
        .with("tails", vec![link("L2", "C2", "C1")]);

    let dot = render(&view, &[root]).unwrap();
    assert!(dot.contains("C1 -> C2[id=\"L1\";fontsize=12.00;headlabel=\"calls\";"));
    assert!(dot.contains("C2 -> C1[id=\"L2\";fontsize=12.00;taillabel=\"calls\";"));
}

#[test]
fn test_multi_valued_endpoints() {
    let view = ViewDefinition::new(
        ViewKind::Subgraph,
        cluster("").with_child(node("children")).with_child(line("links")),
    );
    let fan_out = ci("L1", "calls").with("from", "C1").with(
        "to",
        ci_graph::Value::List(vec!["C2".into(), ci("C3", "c3").into()]),
    );
    let root = ci("R1", "system")
        .with("children", vec![ci("C1", "c1"), ci("C2", "c2"), ci("C3", "c3")])
        .with("links", vec![fan_out]);

    let dot = render(&view, &[root]).unwrap();
    let edges = edge_lines(&dot);
    assert_eq!(edges.len(), 2);
    assert!(edges[0].starts_with("C1 -> C2["));
    assert!(edges[1].starts_with("C1 -> C3["));
}

#[test]
fn test_sequence_view_is_rejected() {
    let view = ViewDefinition::new(ViewKind::Sequence, cluster(""));
    let result = render(&view, &[ci("R1", "system")]);
    assert!(matches!(
        result,
        Err(RenderError::UnsupportedViewKind {
            kind: ViewKind::Sequence
        })
    ));
}
