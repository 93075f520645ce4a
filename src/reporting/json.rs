use crate::reporting::model::ScanReport;
use crate::scan::result::ScanResult;

/// A single scan renders as one object, several as an array.
pub fn render(results: &[ScanResult]) -> anyhow::Result<String> {
    let reports: Vec<ScanReport> = results.iter().map(ScanReport::from).collect();

    let json = match reports.as_slice() {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::test_support::sample_result;
    use serde_json::Value;

    #[test]
    fn single_result_is_an_object() {
        let json = render(&[sample_result()]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["run_id"], "abcd1234");
        assert_eq!(value["tag"], "crlf-abc123");
        assert_eq!(value["probe_kind"], "crlf");
        assert_eq!(value["results_count"], 2);
        assert_eq!(value["positives_count"], 1);
        assert_eq!(value["cancelled"], false);
        assert_eq!(value["advisory"]["cwe"], "CWE-93");

        let positive = &value["positives"][0];
        assert_eq!(positive["vulnerable"], true);
        assert_eq!(positive["classification_label"], "ConfirmedVulnerability");
        assert_eq!(positive["response"]["status_code"], 200);
        assert_eq!(positive["response"]["headers"]["x-crlf-test"], "crlf-abc123");

        let failed = &value["all_results"][1];
        assert_eq!(failed["classification_label"], "Error");
        assert_eq!(failed["response"]["transport_error"]["kind"], "timeout");
    }

    #[test]
    fn several_results_are_an_array() {
        let json = render(&[sample_result(), sample_result()]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
