//! Site profile: selectors, text labels, and bounds for the target map
//! property.
//!
//! Everything the engine knows about the target site's DOM lives here, so
//! pointing the engine at a redesigned frontend (or a different map
//! property) is a matter of editing this module. The rest of the engine
//! only speaks in terms of these names.

/// Base URL for the map search page. The address query is appended as a
/// path segment.
pub const SEARCH_URL: &str = "https://map.naver.com/p/search";

/// One candidate entry in the rendered search result list. Clicking it
/// opens the detail view.
pub const RESULT_ITEM_SELECTOR: &str = "button.link_search";

/// Display name inside a result entry, matched against the target name.
pub const RESULT_TITLE_SELECTOR: &str = "strong.search_title";

/// Optional "show more results" control on the result list. Invoked once
/// to widen the candidate set before matching.
pub const MORE_RESULTS_SELECTOR: &str = "button.link_more";

/// Element that signals the detail view finished rendering.
pub const DETAIL_READY_SELECTOR: &str = "div.place_section";

/// Control that unfolds the weekly hours panel.
pub const HOURS_PANEL_SELECTOR: &str = "div.A_cdD";

/// Text tokens of the hours panel; weekday labels and hour strings arrive
/// interleaved and are scanned pairwise.
pub const HOURS_TOKEN_SELECTOR: &str = "div.w9QyJ span";

/// Phone number on the detail view.
pub const PHONE_SELECTOR: &str = "div.vV_z_ span.xlx7Q";

/// Tab links on the detail view; the info and review tabs are picked out
/// of these by their text labels.
pub const DETAIL_TAB_SELECTOR: &str = "a.fvwqf";

/// Control that expands the truncated introduction text.
pub const EXPAND_INTRO_SELECTOR: &str = "a.OWPIf";

/// Introduction body on the info tab.
pub const INTRO_SELECTOR: &str = "div.T8RFa.CEyr5";

/// Facility / service entries on the info tab.
pub const FACILITY_SELECTOR: &str = "ul.JU0iX li.c7TR6 div.owG4q";

/// Parking description on the info tab.
pub const PARKING_SELECTOR: &str = "div.qbROU div.TZ6eS";

/// Seating entries on the info tab.
pub const SEATING_SELECTOR: &str = "div.place_section_content ul.GXptY li.Lw5L1 div._2eVI0";

/// One highlight entry ("things reviewers liked") on the review tab.
pub const HIGHLIGHT_ITEM_SELECTOR: &str = "li.MHaAm";

/// Label inside a highlight entry.
pub const HIGHLIGHT_LABEL_SELECTOR: &str = "span.t3JSf";

/// Mention count inside a highlight entry.
pub const HIGHLIGHT_COUNT_SELECTOR: &str = "span.CUoLy";

/// Total review count on the review tab.
pub const REVIEW_COUNT_SELECTOR: &str = "em.place_section_count";

/// One rendered review entry.
pub const REVIEW_ITEM_SELECTOR: &str = "li.place_apply_pui.EjjAW";

/// Review date inside a review entry.
pub const REVIEW_DATE_SELECTOR: &str = "time[aria-hidden='true']";

/// Review body inside a review entry.
pub const REVIEW_TEXT_SELECTOR: &str = "div.pui__vn15t2 a[data-pui-click-code='rvshowmore']";

/// Anchors among which the review "load more" control is found by label.
pub const LOAD_MORE_SELECTOR: &str = "a.fvwqf";

/// Tab label for the info tab.
pub const TAB_INFO_LABEL: &str = "정보";

/// Tab label for the review tab.
pub const TAB_REVIEW_LABEL: &str = "리뷰";

/// Label of the most-recent-first sort control on the review tab.
pub const SORT_RECENT_LABEL: &str = "최신순";

/// Label of the review "load more" control.
pub const LOAD_MORE_LABEL: &str = "더보기";

/// Label of the introduction expand control.
pub const EXPAND_INTRO_LABEL: &str = "펼쳐보기";

/// The seven recognized weekday labels, in display order. Hours tokens
/// that match none of these are skipped during pairwise scanning.
pub const WEEKDAY_LABELS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];
