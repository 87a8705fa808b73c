use anyhow::Result;
use async_trait::async_trait;
use sheet_checklist::core::flow::Screen;
use sheet_checklist::core::mapper::SelectionForm;
use sheet_checklist::core::repository::{CSV_DATA_KEY, CSV_URL_KEY, FILTERED_CSV_DATA_KEY};
use sheet_checklist::domain::model::RowId;
use sheet_checklist::domain::ports::{KeyValueStore, SheetSource};
use sheet_checklist::{ChecklistEngine, ChecklistError, FileStore};
use tempfile::TempDir;

const LINK: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-abc/pub?gid=0&single=true&output=csv";

const SHEET: &str = "Name,Room,Paid,Vegan\r\n\
Item 10,B,TRUE,FALSE\r\n\
item 2,A,FALSE,TRUE\r\n\
Alice,C,TRUE,\r\n\
Bob,A,FALSE,FALSE";

/// 模擬已發布的 Google Sheets
struct PublishedSheet {
    body: Option<&'static str>,
    reachable: bool,
}

#[async_trait]
impl SheetSource for PublishedSheet {
    async fn head(&self, _url: &str) -> sheet_checklist::Result<bool> {
        Ok(self.reachable)
    }

    async fn fetch_text(&self, url: &str) -> sheet_checklist::Result<String> {
        self.body
            .map(str::to_string)
            .ok_or_else(|| ChecklistError::HttpStatus {
                status: 500,
                url: url.to_string(),
            })
    }
}

fn engine(dir: &TempDir, sheet: PublishedSheet) -> ChecklistEngine<FileStore, PublishedSheet> {
    ChecklistEngine::new(FileStore::new(dir.path()), sheet)
}

fn sheet() -> PublishedSheet {
    PublishedSheet {
        body: Some(SHEET),
        reachable: true,
    }
}

#[tokio::test]
async fn test_end_to_end_checklist_across_sessions() -> Result<()> {
    let temp_dir = TempDir::new()?;

    // 第一個工作階段：載入連結並選擇欄位
    {
        let engine = engine(&temp_dir, sheet());
        assert_eq!(engine.submit_link(LINK).await?, 4);
        assert_eq!(engine.headers()?, vec!["name", "room", "paid", "vegan"]);

        let mut form = SelectionForm::new().keep(["paid", "room", "name"]);
        form.set_name("name");
        let mapped = engine.apply_selection(&form)?;

        assert_eq!(mapped.len(), 4);
        let paid: Vec<(&str, String)> = mapped[0].retained_columns().collect();
        assert_eq!(
            paid,
            vec![("paid", "Yes".to_string()), ("room", "B".to_string())]
        );
    }

    // 第二個工作階段：從儲存的資料恢復清單
    {
        let engine = engine(&temp_dir, sheet());
        assert_eq!(engine.current_screen()?, Screen::Checklist);

        let mut checklist = engine.open_checklist()?;
        let names: Vec<&str> = checklist.records().iter().map(|r| r.id_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "item 2", "Item 10"]);

        let bob = checklist
            .records()
            .iter()
            .find(|r| r.id_name == "Bob")
            .map(|r| r.row_id)
            .unwrap();
        checklist.toggle(bob)?;

        let unchecked_b: Vec<&str> = checklist
            .filter("b", true)
            .iter()
            .map(|r| r.id_name.as_str())
            .collect();
        assert!(unchecked_b.is_empty());
        assert_eq!(checklist.filter("i", false).len(), 3);
    }

    // 第三個工作階段：勾選狀態已持久化且排序一致
    {
        let engine = engine(&temp_dir, sheet());
        let checklist = engine.open_checklist()?;
        let last = checklist.records().last().unwrap();
        assert_eq!(last.id_name, "Bob");
        assert!(last.check_list);
        assert_eq!(checklist.checked_count(), 1);
    }

    Ok(())
}

#[tokio::test]
async fn test_persisted_entries_use_expected_keys() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let engine = engine(&temp_dir, sheet());
    engine.submit_link(LINK).await?;

    let mut form = SelectionForm::new();
    form.set_name("name");
    engine.apply_selection(&form)?;

    let store = FileStore::new(temp_dir.path());
    assert_eq!(store.get(CSV_URL_KEY)?.as_deref(), Some(LINK));

    let raw: serde_json::Value = serde_json::from_str(&store.get(CSV_DATA_KEY)?.unwrap())?;
    assert_eq!(raw[1]["name"], "item 2");
    assert_eq!(raw[2]["vegan"], "");

    let filtered: serde_json::Value =
        serde_json::from_str(&store.get(FILTERED_CSV_DATA_KEY)?.unwrap())?;
    assert_eq!(filtered[0]["idName"], "Item 10");
    assert_eq!(filtered[0]["checkList"], false);
    assert!(filtered[0].get("room").is_none());
    Ok(())
}

#[tokio::test]
async fn test_failed_download_stores_empty_rows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let engine = engine(
        &temp_dir,
        PublishedSheet {
            body: None,
            reachable: true,
        },
    );

    assert_eq!(engine.submit_link(LINK).await?, 0);
    assert!(engine.headers()?.is_empty());
    assert_eq!(engine.current_screen()?, Screen::ColumnSelection);
    Ok(())
}

#[tokio::test]
async fn test_rejected_links_store_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let engine = engine(
        &temp_dir,
        PublishedSheet {
            body: Some(SHEET),
            reachable: false,
        },
    );

    assert!(matches!(
        engine.submit_link("").await,
        Err(ChecklistError::MissingInput)
    ));
    assert!(matches!(
        engine
            .submit_link("https://docs.google.com/spreadsheets/d/ABC123/edit")
            .await,
        Err(ChecklistError::InvalidLinkFormat { .. })
    ));
    assert!(matches!(
        engine.submit_link(LINK).await,
        Err(ChecklistError::Unreachable { .. })
    ));

    assert_eq!(engine.current_screen()?, Screen::Entry);
    assert!(engine.repository().load_source_url()?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_remap_from_preview_replaces_checklist() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let engine = engine(&temp_dir, sheet());
    engine.submit_link(LINK).await?;

    let mut form = SelectionForm::new();
    form.set_name("name");
    engine.apply_selection(&form)?;
    engine.open_checklist()?.toggle(RowId(0))?;

    form.set_name("room");
    engine.apply_selection(&form)?;

    let checklist = engine.open_checklist()?;
    assert_eq!(checklist.checked_count(), 0);
    assert_eq!(checklist.records()[0].id_name, "A");
    Ok(())
}

#[tokio::test]
async fn test_clear_is_irreversible() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let engine = engine(&temp_dir, sheet());
    engine.submit_link(LINK).await?;

    let mut form = SelectionForm::new();
    form.set_name("name");
    engine.apply_selection(&form)?;

    engine.open_checklist()?.clear()?;

    let engine = self::engine(&temp_dir, sheet());
    assert!(engine.open_checklist()?.is_empty());
    assert!(matches!(engine.headers(), Err(ChecklistError::NoSheetData)));
    assert_eq!(engine.current_screen()?, Screen::Entry);
    Ok(())
}
