//! Page objects built on top of the instrumented page

mod support;

use pagelog_e2e::driver::{NavigateOptions, RoleOptions};
use pagelog_e2e::{Driver, InstrumentedPage, Target};
use pagelog_logging::LogConfig;

use support::{page, session_log, settings, FakeElement, MockDriver};

/// Landing page with a "Get started" call to action
struct HomePage<'a, D: Driver> {
    page: &'a InstrumentedPage<D>,
}

impl<'a, D: Driver> HomePage<'a, D> {
    fn new(page: &'a InstrumentedPage<D>) -> Self {
        Self { page }
    }

    async fn open(&self) -> Result<(), D::Error> {
        self.page.log_step("Open home page");
        self.page.goto("/", NavigateOptions::default()).await?;
        Ok(())
    }

    async fn get_started(&self) -> Result<(), D::Error> {
        self.page.log_step("Follow the get started link");
        let link = self
            .page
            .get_by_role("link", RoleOptions::named("Get started"))
            .await?;
        self.page.click(Target::Handle(link)).await
    }
}

fn home_fixture(dir: &std::path::Path) -> InstrumentedPage<MockDriver> {
    let page = page(dir, settings(dir, LogConfig::default()));
    page.driver()
        .register("Get started", FakeElement::with_text("Get started"));
    page
}

#[tokio::test]
async fn page_object_drives_the_wrapped_primitives() {
    let dir = tempfile::tempdir().unwrap();
    let page = home_fixture(dir.path());
    let home = HomePage::new(&page);

    home.open().await.unwrap();
    home.get_started().await.unwrap();

    assert_eq!(page.driver().calls(), vec!["navigate", "locate_by_role", "click"]);

    let log = session_log(&page);
    let open = log.find("[INFO] Step: Open home page").unwrap();
    let follow = log.find("[INFO] Step: Follow the get started link").unwrap();
    let click = log.find("[INFO] Clicking element: \"Get started\"").unwrap();
    assert!(open < follow && follow < click);
}

#[tokio::test]
async fn page_object_failures_surface_the_driver_error() {
    let dir = tempfile::tempdir().unwrap();
    let page = home_fixture(dir.path());
    page.driver().fail("click", "element is not visible");

    let err = HomePage::new(&page).get_started().await.unwrap_err();

    assert_eq!(err.0, "element is not visible");
    assert_eq!(
        page.driver().calls(),
        vec!["locate_by_role", "click", "capture_screenshot"]
    );
    assert!(session_log(&page).contains("[ERROR] Click failed: \"Get started\" after "));
}
