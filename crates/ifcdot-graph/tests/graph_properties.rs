//! End-to-end properties of graph construction over small hand-written models.

use ifcdot_graph::{build_graph, expand, DiagnosticKind, InterestSet};
use ifcdot_model::Model;
use indoc::indoc;

fn model(data: &str) -> Model {
    Model::parse(&format!("ISO-10303-21;\nDATA;\n{data}ENDSEC;\nEND-ISO-10303-21;\n")).unwrap()
}

fn interest(ids: &[u64]) -> InterestSet {
    ids.iter().copied().collect()
}

/// Site #1 contains wall #2 and door #3; the wall is voided by opening #4,
/// which door #3 fills.
const WALL_WITH_DOOR: &str = indoc! {"
    #1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
    #2=IFCWALL('w',$,'Wall',$,$,$,$,$,$);
    #3=IFCDOOR('d',$,'Door',$,$,$,$,$,$,$,$,$,$);
    #4=IFCOPENINGELEMENT('o',$,'Opening',$,$,$,$,$,$);
    #10=IFCRELCONTAINEDINSPATIALSTRUCTURE('r1',$,$,$,(#2,#3),#1);
    #11=IFCRELVOIDSELEMENT('r2',$,$,$,#2,#4);
    #12=IFCRELFILLSELEMENT('r3',$,$,$,#4,#3);
"};

#[test]
fn test_minimal_site_with_wall() {
    let model = model(indoc! {"
        #1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #2=IFCWALL('w',$,'Wall',$,$,$,$,$,$);
        #3=IFCRELCONTAINEDINSPATIALSTRUCTURE('r',$,$,$,(#2),#1);
    "});

    let output = build_graph(&model, &InterestSet::new());

    assert_eq!(
        output.dot,
        indoc! {r##"
            strict graph G {
            graph [overlap=false,splines=true,rankdir=TB];
            "#1=IfcSite" [color="#ff99cc",style=filled];
            "#2=IfcWall" [color="#9999ff",style=filled];
            "#1=IfcSite"--"#2=IfcWall" [weight=1,style=solid];
            subgraph id_1 {
            cluster=true;
            "#1=IfcSite";
            "#2=IfcWall";
            }
            }
        "##}
    );
    assert_eq!(output.stats.nodes, 2);
    assert_eq!(output.stats.edges, 1);
    assert_eq!(output.stats.clusters, 1);
    assert!(output.diagnostics.is_empty());
    assert!(output.expanded_interest.is_empty());
}

#[test]
fn test_door_colored_as_door() {
    let model = model("#42=IFCDOOR('d',$,'Door',$,$,$,$,$,$,$,$,$,$);\n");
    let output = build_graph(&model, &InterestSet::new());
    assert!(output
        .dot
        .contains(r##""#42=IfcDoor" [color="#99ccff",style=filled];"##));
    assert!(!output.dot.contains("#9999ff"));
}

#[test]
fn test_unfiltered_emits_everything_once() {
    let model = model(WALL_WITH_DOOR);
    let output = build_graph(&model, &InterestSet::new());

    for label in ["#1=IfcSite", "#2=IfcWall", "#3=IfcDoor", "#4=IfcOpeningElement"] {
        let node = format!("\"{label}\" [color=");
        assert_eq!(output.dot.matches(&node).count(), 1, "{label}");
    }

    assert!(output
        .dot
        .contains(r##""#2=IfcWall"--"#4=IfcOpeningElement" [weight=9,style=solid];"##));
    assert!(output
        .dot
        .contains(r##""#4=IfcOpeningElement"--"#3=IfcDoor" [weight=9,style=solid];"##));
    assert_eq!(output.dot.matches("--").count(), 4);
    assert_eq!(output.stats.edges, 4);
}

#[test]
fn test_filter_reports_neighbours_without_edges() {
    let model = model(WALL_WITH_DOOR);
    let output = build_graph(&model, &interest(&[2]));

    assert!(output.dot.contains("\"#2=IfcWall\" [color="));
    assert!(!output.dot.contains("\"#1=IfcSite\" [color="));
    assert!(!output.dot.contains("--"));
    assert!(!output.dot.contains("subgraph"));
    assert_eq!(output.expanded_interest, interest(&[1, 2, 4]));
}

#[test]
fn test_filter_emits_edges_between_members() {
    let model = model(WALL_WITH_DOOR);
    let output = build_graph(&model, &interest(&[1, 2]));

    assert!(output
        .dot
        .contains(r##""#1=IfcSite"--"#2=IfcWall" [weight=1,style=solid];"##));
    assert_eq!(output.stats.edges, 1);
    assert_eq!(output.expanded_interest, interest(&[1, 2, 3, 4]));

    // The site cluster lists only visible children.
    assert!(output
        .dot
        .contains("subgraph id_1 {\ncluster=true;\n\"#1=IfcSite\";\n\"#2=IfcWall\";\n}\n"));
}

#[test]
fn test_expand_grows_one_hop_per_pass() {
    let model = model(WALL_WITH_DOOR);

    let one = expand(&model, &interest(&[2]), 1);
    assert_eq!(one.expanded_interest, interest(&[1, 2, 4]));

    let two = expand(&model, &interest(&[2]), 2);
    assert_eq!(two.expanded_interest, interest(&[1, 2, 3, 4]));
    assert!(two.dot.contains(r##""#1=IfcSite"--"#2=IfcWall""##));
    assert!(two.dot.contains(r##""#2=IfcWall"--"#4=IfcOpeningElement""##));

    // Converged: further hops change nothing.
    let many = expand(&model, &interest(&[2]), 10);
    assert_eq!(many.expanded_interest, interest(&[1, 2, 3, 4]));
    assert_eq!(many.stats.edges, 4);
}

#[test]
fn test_interest_input_is_not_mutated() {
    let model = model(WALL_WITH_DOOR);
    let selection = interest(&[2]);
    let first = build_graph(&model, &selection);
    let second = build_graph(&model, &selection);
    assert_eq!(selection, interest(&[2]));
    assert_eq!(first.dot, second.dot);
    assert_eq!(first.expanded_interest, second.expanded_interest);
}

#[test]
fn test_childless_site_has_no_cluster() {
    let model = model("#1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);\n");
    let output = build_graph(&model, &InterestSet::new());
    assert!(!output.dot.contains("subgraph"));
    assert_eq!(output.stats.clusters, 0);
}

#[test]
fn test_nested_clusters_follow_decomposition() {
    let model = model(indoc! {"
        #1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #2=IFCBUILDING('b',$,'Building',$,$,$,$,$,.ELEMENT.,$,$,$);
        #3=IFCBUILDINGSTOREY('g',$,'Ground',$,$,$,$,$,.ELEMENT.,0.);
        #4=IFCWALL('w',$,'Wall',$,$,$,$,$,$);
        #5=IFCVIRTUALELEMENT('v',$,'Boundary',$,$,$,$,$);
        #10=IFCRELAGGREGATES('r1',$,$,$,#1,(#2));
        #11=IFCRELAGGREGATES('r2',$,$,$,#2,(#3));
        #12=IFCRELCONTAINEDINSPATIALSTRUCTURE('r3',$,$,$,(#4,#5),#3);
    "});
    let output = build_graph(&model, &InterestSet::new());

    let expected_clusters = indoc! {r##"
        subgraph id_1 {
        cluster=true;
        "#1=IfcSite";
        "#2=IfcBuilding";
        subgraph id_2 {
        cluster=true;
        "#2=IfcBuilding";
        "#3=IfcBuildingStorey";
        subgraph id_3 {
        cluster=true;
        "#3=IfcBuildingStorey";
        "#4=IfcWall";
        }
        }
        }
    "##};
    assert!(output.dot.contains(expected_clusters), "{}", output.dot);
    assert_eq!(output.stats.clusters, 3);
}

#[test]
fn test_placeholder_excluded_silently() {
    let model = model(indoc! {"
        #1=IFCSPACE('s',$,'Room',$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
        #2=IFCVIRTUALELEMENT('v',$,'Boundary',$,$,$,$,$);
        #3=IFCWALL('w',$,'Wall',$,$,$,$,$,$);
        #10=IFCRELSPACEBOUNDARY('b1',$,$,$,#1,#2,$,.VIRTUAL.,.INTERNAL.);
        #11=IFCRELSPACEBOUNDARY('b2',$,$,$,#1,#3,$,.PHYSICAL.,.INTERNAL.);
    "});
    let output = build_graph(&model, &InterestSet::new());

    assert!(!output.dot.contains("IfcVirtualElement"));
    assert!(output
        .dot
        .contains(r##""#1=IfcSpace"--"#3=IfcWall" [weight=9,style=dotted];"##));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_unresolved_references_do_not_stop_the_pass() {
    let model = model(indoc! {"
        #1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #2=IFCWALL('w',$,'Wall',$,$,$,$,$,$);
        #3=IFCWALL('w2',$,'Wall',$,$,$,$,$,$);
        #10=IFCRELAGGREGATES('bad',$,$,$,#77,(#2));
        #11=IFCRELCONNECTSELEMENTS('c',$,$,$,$,#2,'nowhere');
        #12=IFCRELCONTAINEDINSPATIALSTRUCTURE('partial',$,$,$,(#88,#2),#1);
        #13=IFCRELCONNECTSPATHELEMENTS('p',$,$,$,$,#2,#3,(),(),.ATEND.,.ATSTART.);
    "});
    let output = build_graph(&model, &InterestSet::new());

    assert!(output
        .dot
        .contains(r##""#1=IfcSite"--"#2=IfcWall" [weight=1,style=solid];"##));
    assert!(output
        .dot
        .contains(r##""#2=IfcWall"--"#3=IfcWall" [weight=9,style=dashed];"##));

    let flagged: Vec<_> = output.diagnostics.iter().map(|d| d.entity_id).collect();
    assert_eq!(flagged, vec![10, 11, 12]);
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::UnresolvedReference));
    assert_eq!(output.stats.skipped_references, 3);
}

#[test]
fn test_edges_need_labelled_endpoints() {
    // The project is a context, not an object: it gets no label, so the
    // aggregation edge to it is dropped without a diagnostic.
    let model = model(indoc! {"
        #1=IFCPROJECT('p',$,'Project',$,$,$,$,$,$);
        #2=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #10=IFCRELAGGREGATES('r',$,$,$,#1,(#2));
    "});
    let output = build_graph(&model, &InterestSet::new());
    assert!(!output.dot.contains("IfcProject"));
    assert_eq!(output.stats.edges, 0);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_decomposition_cycle_is_cut() {
    let model = model(indoc! {"
        #1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #2=IFCBUILDING('b',$,'Building',$,$,$,$,$,.ELEMENT.,$,$,$);
        #10=IFCRELAGGREGATES('r1',$,$,$,#1,(#2));
        #11=IFCRELAGGREGATES('r2',$,$,$,#2,(#1));
    "});
    let output = build_graph(&model, &InterestSet::new());

    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::HierarchyLookup && d.entity_id == 1));
    assert_eq!(output.dot.matches('{').count(), output.dot.matches('}').count());
}

#[test]
fn test_group_assignment_and_structural_connection() {
    let model = model(indoc! {"
        #1=IFCZONE('z',$,'Zone',$,$,$);
        #2=IFCSPACE('s',$,'Room',$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
        #3=IFCSTRUCTURALCURVEMEMBER('m',$,'Member',$,$,$,$,.RIGID_JOINED_MEMBER.,$);
        #4=IFCSTRUCTURALPOINTCONNECTION('c',$,'Node',$,$,$,$,$,$);
        #10=IFCRELASSIGNSTOGROUP('g',$,$,$,(#2),$,#1);
        #11=IFCRELCONNECTSSTRUCTURALMEMBER('k',$,$,$,#3,#4,$,$,$,$);
    "});
    let output = build_graph(&model, &InterestSet::new());

    assert!(output.dot.contains(r##""#1=IfcZone" [color="#ff99ff",style=filled];"##));
    assert!(output
        .dot
        .contains(r##""#3=IfcStructuralCurveMember" [color="#99ff99",style=filled];"##));
    assert!(output
        .dot
        .contains(r##""#1=IfcZone"--"#2=IfcSpace" [weight=1,style=solid];"##));
    assert!(output.dot.contains(
        r##""#3=IfcStructuralCurveMember"--"#4=IfcStructuralPointConnection" [weight=1,style=solid];"##
    ));
}

#[test]
fn test_service_and_infrastructure_subtypes_are_drawn() {
    // Subtypes that reach IfcObject only through intermediate classes:
    // energy conversion, flow terminal, distribution control, facility part
    // and an IFC2x3-only element branch.
    let model = model(indoc! {"
        #1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #2=IFCUNITARYEQUIPMENT('u',$,$,$,$,$,$,$,$);
        #3=IFCELECTRICAPPLIANCE('e',$,$,$,$,$,$,$,$);
        #4=IFCFLOWINSTRUMENT('f',$,$,$,$,$,$,$,$);
        #5=IFCBRIDGEPART('b',$,$,$,$,$,$,$,.ELEMENT.,$,$,$);
        #6=IFCEQUIPMENTELEMENT('q',$,$,$,$,$,$,$);
        #10=IFCRELCONTAINEDINSPATIALSTRUCTURE('r1',$,$,$,(#2,#3,#4,#6),#1);
        #11=IFCRELAGGREGATES('r2',$,$,$,#1,(#5));
    "});
    let output = build_graph(&model, &InterestSet::new());

    assert_eq!(output.stats.nodes, 6);
    assert_eq!(output.stats.edges, 5);
    assert!(output.diagnostics.is_empty());
    assert!(output
        .dot
        .contains(r##""#2=IfcUnitaryEquipment" [color="#9999ff",style=filled];"##));
    assert!(output
        .dot
        .contains(r##""#5=IfcBridgePart" [color="#ff99cc",style=filled];"##));
    assert!(output
        .dot
        .contains(r##""#1=IfcSite"--"#4=IfcFlowInstrument" [weight=1,style=solid];"##));
    assert!(output
        .dot
        .contains(r##""#1=IfcSite"--"#5=IfcBridgePart" [weight=9,style=solid];"##));

    let cluster = concat!(
        "subgraph id_1 {\n",
        "cluster=true;\n",
        "\"#1=IfcSite\";\n",
        "\"#2=IfcUnitaryEquipment\";\n",
        "\"#3=IfcElectricAppliance\";\n",
        "\"#4=IfcFlowInstrument\";\n",
        "\"#6=IfcEquipmentElement\";\n",
        "\"#5=IfcBridgePart\";\n",
        "}\n",
    );
    assert!(output.dot.contains(cluster), "{}", output.dot);
}

#[test]
fn test_unknown_class_drawn_with_default_style() {
    let model = model(indoc! {"
        #1=IFCSITE('s',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);
        #2=IFCFUTUREWIDGET('x',$,$,$,$,$,$,$);
        #3=IFCFUTUREPOINT((0.,0.,0.));
        #10=IFCRELCONTAINEDINSPATIALSTRUCTURE('r',$,$,$,(#2),#1);
    "});
    let output = build_graph(&model, &InterestSet::new());

    assert!(output
        .dot
        .contains(r##""#2=IFCFUTUREWIDGET" [color="#ff9999",style=filled];"##));
    assert!(output
        .dot
        .contains(r##""#1=IfcSite"--"#2=IFCFUTUREWIDGET" [weight=1,style=solid];"##));
    assert!(!output.dot.contains("IFCFUTUREPOINT"));
    assert_eq!(output.stats.clusters, 1);

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::UnknownClass);
    assert_eq!(output.diagnostics[0].entity_id, 2);
}

#[test]
fn test_unset_optional_role_is_not_a_diagnostic() {
    let model = model(indoc! {"
        #1=IFCSPACE('sp',$,$,$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
        #10=IFCRELSPACEBOUNDARY('b',$,$,$,#1,$,$,.VIRTUAL.,.INTERNAL.);
    "});
    let output = build_graph(&model, &InterestSet::new());

    assert_eq!(output.stats.nodes, 1);
    assert_eq!(output.stats.edges, 0);
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.stats.skipped_references, 0);
}
