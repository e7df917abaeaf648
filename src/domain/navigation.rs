//! Navigation chrome: which pages exist, which one is active, and what the
//! window title says.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub title: &'static str,
}

pub const BRAND: &str = "期貨自動交易 Dashboard";
pub const NOT_FOUND_TITLE: &str = "找不到頁面";

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        path: "/dashboard",
        label: "Dashboard",
        title: "系統總覽",
    },
    NavItem {
        path: "/strategies",
        label: "策略管理",
        title: "策略管理",
    },
    NavItem {
        path: "/orders",
        label: "Orders",
        title: "手動下單",
    },
    NavItem {
        path: "/positions",
        label: "Positions",
        title: "未平倉部位",
    },
    NavItem {
        path: "/trades",
        label: "Trades",
        title: "成交紀錄",
    },
    NavItem {
        path: "/alerts",
        label: "Alerts",
        title: "訊號與通知",
    },
];

fn first_segment(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

/// The nav entry for a request path, matched on the first path segment.
/// The root path belongs to the dashboard.
pub fn active_item(path: &str) -> Option<&'static NavItem> {
    match first_segment(path) {
        "" => NAV_ITEMS.first(),
        segment => NAV_ITEMS
            .iter()
            .find(|item| item.path.trim_start_matches('/') == segment),
    }
}

pub fn page_title(path: &str) -> &'static str {
    active_item(path).map_or(NOT_FOUND_TITLE, |item| item.title)
}

/// A nav entry as rendered, with its highlight state resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

pub fn nav_links(current_path: &str) -> Vec<NavLink> {
    let active = active_item(current_path);
    NAV_ITEMS
        .iter()
        .map(|item| NavLink {
            path: item.path,
            label: item.label,
            active: active.is_some_and(|a| a.path == item.path),
        })
        .collect()
}
