//! HTML rendering
//!
//! Both pages share one client-side renderer. The static report embeds the
//! batch as JSON; the upload page fetches the same shape from `/api/upload`.

use anyhow::Result;
use chrono::Local;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::batch::BatchReport;
use crate::config::ReportConfig;

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { border-bottom: 3px solid #2980b9; padding-bottom: 20px; margin-bottom: 30px; }
        .stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 15px; margin: 20px 0; }
        .stat-card { background: #f8f9fa; padding: 15px; border-radius: 6px; text-align: center; }
        .stat-number { font-size: 2em; font-weight: bold; color: #2980b9; }
        .section { margin: 20px 0; }
        .section-header { background: #34495e; color: white; padding: 12px 15px; cursor: pointer; user-select: none; border-radius: 4px 4px 0 0; }
        .section-content { border: 1px solid #34495e; border-top: none; border-radius: 0 0 4px 4px; padding: 15px; }
        .collapsible { display: none; }
        .collapsible.active { display: block; }
        table { width: 100%; border-collapse: collapse; margin: 10px 0; }
        th, td { padding: 8px 12px; text-align: left; border-bottom: 1px solid #ddd; vertical-align: top; }
        th { background: #ecf0f1; font-weight: 600; }
        .file-path { font-family: monospace; color: #2980b9; word-break: break-all; }
        .pass { color: #27ae60; font-weight: 600; }
        .fail { color: #c0392b; font-weight: 600; }
        .error { color: #c0392b; font-family: monospace; }
        .reason { color: #555; font-size: 0.9em; }
        .content-block { white-space: pre-wrap; background: #fafafa; padding: 10px; border-radius: 4px; }
        .search-box { width: 100%; padding: 10px; margin: 10px 0; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box; }
        .upload { border: 2px dashed #bbb; padding: 30px; text-align: center; border-radius: 8px; margin-bottom: 20px; }
        tr:hover { background: #f8f9fa; }
"#;

const RENDER_SCRIPT: &str = r#"
        function esc(value) {
            const text = typeof value === 'string' ? value : JSON.stringify(value);
            return String(text ?? '').replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;').replace(/"/g, '&quot;');
        }

        function toggleSection(id) {
            document.getElementById(id).classList.toggle('active');
        }

        function filterDocuments(input) {
            const filter = input.value.toLowerCase();
            document.querySelectorAll('.document').forEach(section => {
                section.style.display = section.textContent.toLowerCase().includes(filter) ? '' : 'none';
            });
        }

        function statCard(value, label) {
            return `<div class="stat-card"><div class="stat-number">${esc(value)}</div><div>${esc(label)}</div></div>`;
        }

        function renderMap(map) {
            const rows = Object.entries(map || {}).map(([key, value]) => {
                const shown = value && typeof value === 'object' && !Array.isArray(value)
                    ? Object.entries(value).map(([k, v]) => `${esc(k)}: ${esc(v)}`).join('<br>')
                    : esc(value);
                return `<tr><th>${esc(key)}</th><td class="content-block">${shown}</td></tr>`;
            });
            return rows.length ? `<table>${rows.join('')}</table>` : '';
        }

        function renderRubrics(rubrics) {
            if (!rubrics || !rubrics.length) return '';
            const models = new Set();
            rubrics.forEach(r => Object.keys(r || {}).forEach(k => {
                if (/^model\d+_judgement$/.test(k)) models.add(k);
            }));
            const columns = [...models].sort((a, b) => parseInt(a.slice(5)) - parseInt(b.slice(5)));
            const head = ['#', 'Label', 'Sub-label', 'Weight', 'Description']
                .concat(columns.map(c => c.replace('_judgement', '')))
                .map(h => `<th>${esc(h)}</th>`).join('');
            const body = rubrics.map((r, idx) => {
                r = r || {};
                const cells = columns.map(c => {
                    const j = r[c];
                    if (!j || typeof j !== 'object') return '<td></td>';
                    const passed = j.score === 1 || j.score === true;
                    const score = j.score === undefined ? 'N/A' : j.score;
                    const reason = j.reason ? `<div class="reason">${esc(j.reason)}</div>` : '';
                    return `<td><span class="${passed ? 'pass' : 'fail'}">${esc(score)}</span>${reason}</td>`;
                }).join('');
                return `<tr><td>${idx + 1}</td><td>${esc(r.label ?? 'N/A')}</td><td>${esc(r.sub_label ?? '')}</td>`
                    + `<td>${esc(r.weight ?? '')}</td><td>${esc(r.description ?? '')}</td>${cells}</tr>`;
            }).join('');
            return `<table><thead><tr>${head}</tr></thead><tbody>${body}</tbody></table>`;
        }

        function renderStatistics(stats) {
            const labels = Object.entries(stats.label_distribution || {})
                .map(([label, count]) => `<tr><td>${esc(label)}</td><td>${count}</td></tr>`).join('');
            return `<p>Rubrics: <b>${stats.total_rubrics}</b> &middot; Total weight: <b>${stats.total_weight}</b></p>`
                + (labels ? `<table><thead><tr><th>Label</th><th>Count</th></tr></thead><tbody>${labels}</tbody></table>` : '');
        }

        function renderJudgements(summary) {
            const rows = Object.entries(summary || {}).map(([model, t]) => {
                const rate = t.scored ? (100 * t.passed / t.scored).toFixed(1) + '%' : '-';
                return `<tr><td>${esc(model)}</td><td>${t.judged}</td><td>${t.scored}</td><td>${t.passed}</td><td>${rate}</td></tr>`;
            }).join('');
            return rows ? `<table><thead><tr><th>Model</th><th>Judged</th><th>Scored</th><th>Passed</th><th>Pass rate</th></tr></thead><tbody>${rows}</tbody></table>` : '';
        }

        function renderDocument(result, idx) {
            const id = `doc-${idx}`;
            const size = result.size !== undefined ? ` (${result.size} bytes)` : '';
            let body;
            if (result.success) {
                body = [
                    ['Metadata', renderMap(result.metadata)],
                    ['Content', renderMap(result.content)],
                    ['Evaluation', renderRubrics(result.rubrics)],
                    ['Statistics', renderStatistics(result.statistics)],
                ].filter(([, html]) => html).map(([title, html]) => `<h3>${title}</h3>${html}`).join('');
            } else {
                body = `<p class="error">${esc(result.error)}</p>`;
            }
            const marker = result.success ? '' : ' ✗';
            return `<div class="section document">
                <div class="section-header" onclick="toggleSection('${id}')"><span class="file-path">${esc(result.identifier)}</span>${esc(size)}${marker}</div>
                <div id="${id}" class="section-content collapsible">${body}</div>
            </div>`;
        }

        function renderBatch(data, target) {
            const results = data.results || [];
            const aggregate = data.aggregate || { total_rubrics: 0, total_weight: 0, label_distribution: {} };
            target.innerHTML = `
                <div class="stats-grid">
                    ${statCard(data.total, 'Documents')}
                    ${statCard(data.success, 'Loaded')}
                    ${statCard(aggregate.total_rubrics, 'Rubrics')}
                    ${statCard(aggregate.total_weight, 'Total weight')}
                </div>
                <div class="section"><h2>Aggregate</h2>${renderStatistics(aggregate)}${renderJudgements(data.judgement_summary)}</div>
                <input type="text" class="search-box" placeholder="Filter documents..." onkeyup="filterDocuments(this)">
                ${results.map(renderDocument).join('')}`;
        }
"#;

const UPLOAD_SCRIPT: &str = r#"
        async function uploadFiles(event) {
            event.preventDefault();
            const input = document.getElementById('files');
            const form = new FormData();
            for (const file of input.files) form.append('files', file, file.name);
            const target = document.getElementById('results');
            target.textContent = 'Uploading...';
            try {
                const response = await fetch('/api/upload', { method: 'POST', body: form });
                const data = await response.json();
                if (!response.ok) {
                    target.innerHTML = `<p class="error">${esc(data.error || response.statusText)}</p>`;
                    return;
                }
                renderBatch(data, target);
            } catch (err) {
                target.innerHTML = `<p class="error">${esc(String(err))}</p>`;
            }
        }
"#;

pub struct HtmlReport<'a> {
    config: &'a ReportConfig,
}

impl<'a> HtmlReport<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Self-contained page for a scanned batch
    pub fn render(&self, report: &BatchReport) -> Result<String> {
        let data = json!({
            "total": report.total,
            "success": report.success,
            "results": report.documents,
            "aggregate": report.aggregate,
            "judgement_summary": report.judgement_summary,
        });
        let embedded = embed_json(&serde_json::to_string(&data)?);
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S");

        let body = format!(
            r#"<div id="results"></div>
        <script type="application/json" id="viewer-data">{embedded}</script>
        <script>
            renderBatch(JSON.parse(document.getElementById('viewer-data').textContent), document.getElementById('results'));
        </script>"#
        );

        Ok(self.page(&format!("Generated on {generated}"), &body, ""))
    }

    /// Page served at `/`: a file picker posting to `/api/upload`
    pub fn upload_page(&self) -> String {
        let body = r#"<form class="upload" onsubmit="uploadFiles(event)">
            <p>Select one or more <code>.json</code> files</p>
            <input type="file" id="files" name="files" accept=".json,application/json" multiple>
            <button type="submit">Upload</button>
        </form>
        <div id="results"></div>"#;

        self.page("Upload evaluation documents", body, UPLOAD_SCRIPT)
    }

    fn page(&self, subtitle: &str, body: &str, extra_script: &str) -> String {
        let title = escape_html(&self.config.title);
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
    <script>{RENDER_SCRIPT}{extra_script}</script>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🔍 {title}</h1>
            <p>{subtitle}</p>
        </div>
        {body}
    </div>
</body>
</html>"#
        )
    }

    /// Render the report into `output`
    pub fn write(&self, report: &BatchReport, output: &Path) -> Result<()> {
        let html = self.render(report)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, html)?;
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Markup characters only occur inside JSON strings, so escaping them keeps
/// the tokenizer in plain script data without changing the parsed value
fn embed_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchProcessor, SourceDocument};
    use serde_json::Value;
    use tempfile::TempDir;

    fn report_with(document: Value) -> BatchReport {
        BatchProcessor::default()
            .process(vec![SourceDocument::parsed("case.json", document)])
            .unwrap()
    }

    fn embedded_data(html: &str) -> Value {
        let start_tag = r#"<script type="application/json" id="viewer-data">"#;
        let start = html.find(start_tag).unwrap() + start_tag.len();
        let end = start + html[start..].find("</script>").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_render_embeds_batch_data() {
        let config = ReportConfig::default();
        let report = report_with(serde_json::json!({
            "uid": "x1",
            "rubrics": [{ "label": "a", "weight": 2 }]
        }));
        let html = HtmlReport::new(&config).render(&report).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>JSON Viewer</title>"));
        let data = embedded_data(&html);
        assert_eq!(data["total"], 1);
        assert_eq!(data["results"][0]["metadata"]["uid"], "x1");
        assert_eq!(data["aggregate"]["total_weight"], 2.0);
    }

    #[test]
    fn test_script_close_in_document_cannot_break_page() {
        let config = ReportConfig::default();
        let report = report_with(serde_json::json!({ "prompt": "</script><b>hi</b>" }));
        let html = HtmlReport::new(&config).render(&report).unwrap();

        let data = embedded_data(&html);
        assert_eq!(data["results"][0]["content"]["prompt"], "</script><b>hi</b>");
    }

    #[test]
    fn test_comment_opened_script_in_document_stays_inert() {
        let config = ReportConfig::default();
        let prompt = "<!--<script> & more -->";
        let report = report_with(serde_json::json!({ "prompt": prompt }));
        let html = HtmlReport::new(&config).render(&report).unwrap();

        let start_tag = r#"<script type="application/json" id="viewer-data">"#;
        let start = html.find(start_tag).unwrap() + start_tag.len();
        let end = start + html[start..].find("</script>").unwrap();
        let payload = &html[start..end];
        assert!(!payload.contains('<'));
        assert!(!payload.contains('>'));
        assert!(payload.contains(r"\u003c!--\u003cscript\u003e"));

        let data = embedded_data(&html);
        assert_eq!(data["results"][0]["content"]["prompt"], prompt);
        assert!(html.contains("renderBatch(JSON.parse"));
    }

    #[test]
    fn test_title_is_escaped() {
        let config = ReportConfig {
            title: "<Evals & more>".to_string(),
            ..ReportConfig::default()
        };
        let page = HtmlReport::new(&config).upload_page();
        assert!(page.contains("&lt;Evals &amp; more&gt;"));
        assert!(page.contains("/api/upload"));
        assert!(!page.contains("viewer-data"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out/report.html");
        let config = ReportConfig::default();
        HtmlReport::new(&config)
            .write(&report_with(serde_json::json!({})), &output)
            .unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("viewer-data"));
    }
}
