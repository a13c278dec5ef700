//! Integration tests for analysis-explorer

use analysis_explorer::{
    BoxedNode, Config, ConfigAnalysis, Criteria, ExplorerError, ExplorerNode, FactoryError,
    JsonFormatter, LoggerOutputter, MatchOutcome, NodeFactory, ResultNode, ResultPath,
    ResultsExplorer, Searcher, Severity,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(name: &str) -> ConfigAnalysis {
    ConfigAnalysis::from_file(&fixtures_path().join(name)).unwrap()
}

fn paths(explorer: &ResultsExplorer<'_>, criteria: &Criteria) -> Vec<String> {
    explorer
        .query_matches(Some(criteria))
        .unwrap()
        .iter()
        .map(|found| found.path.to_string())
        .collect()
}

#[test]
fn test_load_fixture() {
    let analysis = load_fixture("analysis.json");

    assert_eq!(analysis.culture_ids, vec!["en", "fr"]);
    assert_eq!(analysis.value_host_results.len(), 2);
    assert_eq!(analysis.lookup_key_results.len(), 2);
}

#[test]
fn test_count_everything() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    assert_eq!(explorer.count_value_host_matches(None).unwrap(), 12);
    assert_eq!(explorer.count_lookup_key_matches(None).unwrap(), 11);
    assert_eq!(explorer.count_matches(None).unwrap(), 23);
    assert_eq!(explorer.count_matches(Some(&Criteria::new())).unwrap(), 23);
}

#[test]
fn test_collect_is_pre_order_with_suffixed_keys() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    let found: Vec<String> = explorer
        .query_value_host_matches(None)
        .unwrap()
        .iter()
        .map(|found| found.path.to_string())
        .collect();

    assert_eq!(
        found,
        vec![
            "ValueHost: startDate",
            "ValueHost: startDate > Property: dataType",
            "ValueHost: startDate > LocalizedProperty: labell10n",
            "ValueHost: startDate > Validator: Required",
            "ValueHost: startDate > Validator: Required > Property: errorMessage",
            "ValueHost: startDate > Validator: Required > Condition: RequireText",
            "ValueHost: startDate > Validator: Required > Condition: RequireText > Property: valueHostName",
            "ValueHost: startDate > Condition: All",
            "ValueHost: startDate > Condition: All > Condition#2: Any",
            "ValueHost: startDate > Condition: All > Condition#2: Any > Condition#3: DataTypeCheck",
            "ValueHost: startDate > Condition: All > Condition#2: Any > Condition#3: DataTypeCheck > Property: valueHostName",
            "ValueHost: endDate",
        ]
    );
}

#[test]
fn test_query_by_dimension() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    assert_eq!(
        paths(&explorer, &Criteria::new().with_features(["property"])).len(),
        4
    );
    assert_eq!(
        paths(&explorer, &Criteria::new().with_service_names(["parser"])),
        vec![
            "LookupKey: Date > Parser",
            "LookupKey: Date > Parser > ParsersByCulture: en",
            "LookupKey: Date > Parser > ParsersByCulture: en > ParserFound: DateParser",
            "LookupKey: Date > Parser > ParsersByCulture: fr",
        ]
    );
    assert_eq!(
        paths(&explorer, &Criteria::new().with_culture_ids(["FR"])),
        vec![
            "ValueHost: startDate > LocalizedProperty: labell10n",
            "LookupKey: Date > Parser > ParsersByCulture: fr",
            "LookupKey: Date > Formatter > FormattersByCulture: fr",
        ]
    );
    assert_eq!(
        paths(&explorer, &Criteria::new().with_property_names(["label"])),
        vec!["ValueHost: startDate > LocalizedProperty: labell10n"]
    );
    assert_eq!(
        paths(&explorer, &Criteria::new().with_lookup_keys(["money"])),
        vec!["LookupKey: Money"]
    );
}

#[test]
fn test_query_by_severity() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    assert_eq!(
        paths(
            &explorer,
            &Criteria::new().with_severities([Some(Severity::Warning)])
        ),
        vec![
            "ValueHost: startDate > LocalizedProperty: labell10n",
            "LookupKey: Date > Parser > ParsersByCulture: fr",
        ]
    );

    // Nodes without a severity
    let unassigned = explorer
        .count_matches(Some(&Criteria::new().with_severities([None])))
        .unwrap();
    assert_eq!(unassigned, 23 - 6);
}

#[test]
fn test_combined_dimensions() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    let criteria = Criteria::new()
        .with_features(["Property"])
        .with_property_names(["valueHostName"])
        .with_severities([Some(Severity::Error)]);

    assert_eq!(
        paths(&explorer, &criteria),
        vec!["ValueHost: startDate > Condition: All > Condition#2: Any > Condition#3: DataTypeCheck > Property: valueHostName"]
    );
}

#[test]
fn test_pruning() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    let criteria = Criteria::new().with_condition_types(["DataTypeCheck"]);
    assert_eq!(explorer.count_matches(Some(&criteria)).unwrap(), 1);
    assert_eq!(explorer.count_matches(Some(&criteria.pruned())).unwrap(), 0);

    let criteria = Criteria::new().with_value_host_names(["endDate"]).pruned();
    assert_eq!(paths(&explorer, &criteria), vec!["ValueHost: endDate"]);
}

#[test]
fn test_find_first_and_has_match() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    let first = explorer
        .find_first(Some(&Criteria::errors_only()))
        .unwrap()
        .unwrap();
    assert_eq!(first.result.message(), Some("Value host \"missing\" is not defined"));

    assert!(explorer
        .has_any_match(Some(&Criteria::new().with_culture_ids(["en"])))
        .unwrap());
    assert!(!explorer
        .has_any_match(Some(&Criteria::new().with_culture_ids(["de"])))
        .unwrap());
}

#[test]
fn test_find_first_agrees_with_query() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    let criteria_list = [
        Criteria::new().with_features(["ParserFound"]),
        Criteria::new().with_severities([Some(Severity::Info)]),
        Criteria::new().with_condition_types(["Any"]).pruned(),
        Criteria::new().with_error_codes(["Compare"]),
    ];

    for criteria in &criteria_list {
        let all = explorer.query_matches(Some(criteria)).unwrap();
        let first = explorer.find_first(Some(criteria)).unwrap();
        assert_eq!(first.map(|f| f.path), all.first().map(|f| f.path.clone()));
        assert_eq!(
            explorer.has_any_match(Some(criteria)).unwrap(),
            explorer.count_matches(Some(criteria)).unwrap() > 0
        );
    }
}

#[test]
fn test_get_by_path() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);
    let candidates = explorer.query_matches(None).unwrap();

    let path: ResultPath = "ValueHost=startDate,Condition=All,Condition#2=Any,Condition#3=datatypecheck"
        .parse()
        .unwrap();
    let found = ResultsExplorer::get_by_path(&path, &candidates).unwrap();
    let ResultNode::Condition(condition) = found.result else {
        panic!("expected condition, got {:?}", found.result);
    };
    assert_eq!(condition.condition_type, "DataTypeCheck");

    let path: ResultPath = "LookupKey=Money,Identifier".parse().unwrap();
    let found = ResultsExplorer::get_by_path(&path, &candidates).unwrap();
    assert!(found.result.is_error());

    let path: ResultPath = "ValueHost=startDate,Condition=All,Condition#2=Any".parse().unwrap();
    let shorter: ResultPath = "ValueHost=startDate,Condition#2=Any".parse().unwrap();
    assert!(ResultsExplorer::get_by_path(&path, &candidates).is_some());
    assert!(ResultsExplorer::get_by_path(&shorter, &candidates).is_none());
}

#[test]
fn test_get_by_path_round_trip() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);
    let candidates = explorer.query_matches(None).unwrap();

    for candidate in &candidates {
        let found = ResultsExplorer::get_by_path(&candidate.path, &candidates).unwrap();
        assert!(std::ptr::eq(found.result, candidate.result));
    }
}

#[test]
fn test_has_errors() {
    let analysis = load_fixture("analysis.json");
    assert!(ResultsExplorer::new(&analysis).has_errors().unwrap());

    let clean = load_fixture("clean.json");
    assert!(!ResultsExplorer::new(&clean).has_errors().unwrap());
}

#[test]
fn test_throw_on_errors() {
    let clean = load_fixture("clean.json");
    assert!(ResultsExplorer::new(&clean)
        .throw_on_errors(true, None)
        .is_ok());

    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);
    let outputter = LoggerOutputter::new(Box::new(JsonFormatter::new()), log::Level::Debug);

    let err = explorer
        .throw_on_errors(false, Some(&outputter))
        .unwrap_err();
    let ExplorerError::ConfigurationHasErrors { content } = &err else {
        panic!("expected configuration error, got {:?}", err);
    };

    let report: serde_json::Value = serde_json::from_str(content).unwrap();
    assert_eq!(
        report["valueHostResults"][0]["path"],
        json!({
            "ValueHost": "startDate",
            "Condition": "All",
            "Condition#2": "Any",
            "Condition#3": "DataTypeCheck",
            "Property": "valueHostName"
        })
    );
    assert_eq!(
        report["lookupKeyResults"][0]["result"],
        json!({
            "feature": "Identifier",
            "severity": "error",
            "message": "No identifier registered for \"Money\""
        })
    );
    assert!(report.get("analysis").is_none());
}

#[test]
fn test_build_report_bag() {
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    let bag = explorer.build_report_bag(true, false, false).unwrap();
    assert_eq!(bag.value_host_results.as_ref().map(Vec::len), Some(12));
    assert!(bag.lookup_key_results.is_none());
    assert!(bag.analysis.is_none());

    let bag = explorer
        .build_report_bag(
            None::<Criteria>,
            Criteria::new().with_service_names(["formatter"]),
            true,
        )
        .unwrap();
    assert!(bag.value_host_results.is_none());
    assert_eq!(bag.lookup_key_results.as_ref().map(Vec::len), Some(2));

    let report = serde_json::to_value(&bag).unwrap();
    assert_eq!(report["analysis"]["cultureIds"], json!(["en", "fr"]));
    assert_eq!(
        report["lookupKeyResults"][1]["result"]["actualCultureId"],
        json!("en")
    );
}

struct WidgetNode<'a> {
    node: &'a ResultNode,
}

impl<'a> ExplorerNode<'a> for WidgetNode<'a> {
    fn result(&self) -> &'a ResultNode {
        self.node
    }

    fn identity(&self) -> Option<&'a str> {
        match self.node {
            ResultNode::Custom(custom) => custom.field_str("widgetName"),
            _ => None,
        }
    }

    fn children(&self) -> Vec<&'a ResultNode> {
        match self.node {
            ResultNode::Custom(custom) => custom.children.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn match_own_dimension(&self, searcher: &Searcher) -> MatchOutcome {
        searcher.match_property_name(self.identity())
    }
}

fn widget_node<'a>(node: &'a ResultNode) -> Result<BoxedNode<'a>, FactoryError> {
    Ok(Box::new(WidgetNode { node }))
}

#[test]
fn test_custom_feature_requires_registration() {
    let analysis = load_fixture("custom.json");
    let explorer = ResultsExplorer::new(&analysis);

    let err = explorer.count_matches(None).unwrap_err();
    let ExplorerError::Factory(FactoryError::UnregisteredFeature { feature }) = &err else {
        panic!("expected unregistered feature, got {:?}", err);
    };
    assert_eq!(feature, "Widget");
}

#[test]
fn test_custom_feature_registered() {
    let analysis = load_fixture("custom.json");
    let mut factory = NodeFactory::new();
    factory.register("Widget", widget_node);
    let explorer = ResultsExplorer::with_factory(&analysis, factory);

    assert_eq!(explorer.count_matches(None).unwrap(), 3);
    assert_eq!(
        paths(&explorer, &Criteria::new().with_property_names(["spinner"])),
        vec!["ValueHost: quantity > Widget: spinner"]
    );
    assert_eq!(
        paths(&explorer, &Criteria::errors_only()),
        vec!["ValueHost: quantity > Widget: spinner > Error"]
    );
    assert!(explorer.has_errors().unwrap());
}

#[test]
fn test_config_criteria_applied_to_queries() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "criteria:\n  features: [Property]\n  severities: [info]\noutput:\n  format: json"
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    let analysis = load_fixture("analysis.json");
    let explorer = ResultsExplorer::new(&analysis);

    let criteria = config.criteria_with(Criteria::new());
    assert_eq!(
        paths(&explorer, &criteria),
        vec!["ValueHost: startDate > Property: dataType"]
    );

    let criteria = config.criteria_with(Criteria::new().with_severities([Some(Severity::Error)]));
    assert_eq!(explorer.count_matches(Some(&criteria)).unwrap(), 1);
}
