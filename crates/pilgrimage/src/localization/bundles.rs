//! Static translation bundles.

use serde::Serialize;

/// Code of the language every lookup falls back to.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

/// The display strings of one language.
#[derive(Debug, PartialEq, Eq)]
pub struct Bundle {
    code: &'static str,
    name: &'static str,
    direction: TextDirection,
    entries: &'static [(&'static str, &'static str)],
}

impl Bundle {
    /// Language code, e.g. `"ar"`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Language name in that language.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Writing direction.
    #[must_use]
    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    /// Look up a dotted key in this bundle only.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Look up a key, falling back to the default bundle, then to the key.
    #[must_use]
    pub fn text<'a>(&self, key: &'a str) -> &'a str {
        match self.get(key).or_else(|| default_bundle().get(key)) {
            Some(text) => text,
            None => key,
        }
    }

    /// Look up a key and substitute `{name}`-style placeholders.
    #[must_use]
    pub fn fill(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.text(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    /// Entries directly under `section`, with the prefix stripped.
    ///
    /// `section("sos")` yields `("confirm", ..)` for `sos.confirm` but not
    /// `sos.follow_up.title`.
    pub fn section<'a>(
        &'a self,
        section: &'a str,
    ) -> impl Iterator<Item = (&'static str, &'static str)> + 'a {
        self.entries.iter().filter_map(move |(key, value)| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('.'))
                .filter(|rest| !rest.contains('.'))
                .map(|rest| (rest, *value))
        })
    }

    /// All keys, in table order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bundle has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static ENGLISH: Bundle = Bundle {
    code: "en",
    name: "English",
    direction: TextDirection::Ltr,
    entries: &[
        ("app.title", "Pilgrim Companion"),
        ("header.greeting", "Welcome, {name}"),
        ("header.sign_in", "Sign in"),
        ("header.sign_out", "Sign out"),
        ("nav.home", "Home"),
        ("nav.lost_found", "Lost & Found"),
        ("nav.dashboard", "Dashboard"),
        ("nav.profile", "Profile"),
        ("dashboard.pilgrim", "My Journey"),
        ("dashboard.volunteer", "Volunteer Desk"),
        ("dashboard.authority", "Command Center"),
        ("dashboard.admin", "Administration"),
        ("panel.itinerary", "Itinerary"),
        ("panel.lost_found_reports", "Lost & found reports"),
        ("panel.assigned_cases", "Assigned cases"),
        ("panel.active_alerts", "Active alerts"),
        ("panel.zone_overview", "Zone overview"),
        ("panel.user_management", "User management"),
        ("panel.system_health", "System health"),
        ("panel.emergency_contacts", "Emergency contacts"),
        ("profile.emergency_contacts", "Emergency contacts"),
        ("profile.no_contacts", "No emergency contacts yet"),
        ("profile.sos_history", "SOS history"),
        ("profile.no_history", "No previous SOS alerts"),
        ("profile.saved", "Profile saved"),
        ("sos.button", "SOS"),
        ("sos.active", "SOS active"),
        ("sos.confirm_title", "Send an emergency alert?"),
        (
            "sos.confirm_body",
            "Nearby volunteers and authorities will be notified of your location.",
        ),
        ("sos.confirm", "Send SOS"),
        ("sos.cancel", "Cancel"),
        ("sos.sent", "Emergency alert sent"),
        ("sos.cancelled", "SOS cancelled"),
        ("sos.follow_up_title", "Who do you want to call?"),
        ("sos.call", "Call"),
        ("sos.close", "Close"),
        ("notify.signed_in", "Signed in as {name}"),
        ("notify.signed_out", "You have signed out"),
        ("notify.language_changed", "Language changed"),
    ],
};

static ARABIC: Bundle = Bundle {
    code: "ar",
    name: "العربية",
    direction: TextDirection::Rtl,
    entries: &[
        ("app.title", "رفيق الحاج"),
        ("header.greeting", "مرحباً، {name}"),
        ("header.sign_in", "تسجيل الدخول"),
        ("header.sign_out", "تسجيل الخروج"),
        ("nav.home", "الرئيسية"),
        ("nav.lost_found", "المفقودات"),
        ("nav.dashboard", "لوحة التحكم"),
        ("nav.profile", "الملف الشخصي"),
        ("dashboard.pilgrim", "رحلتي"),
        ("dashboard.volunteer", "مكتب المتطوعين"),
        ("dashboard.authority", "مركز القيادة"),
        ("dashboard.admin", "الإدارة"),
        ("panel.itinerary", "برنامج الرحلة"),
        ("panel.lost_found_reports", "بلاغات المفقودات"),
        ("panel.assigned_cases", "الحالات المسندة"),
        ("panel.active_alerts", "التنبيهات النشطة"),
        ("panel.zone_overview", "نظرة على المنطقة"),
        ("panel.user_management", "إدارة المستخدمين"),
        ("panel.system_health", "حالة النظام"),
        ("panel.emergency_contacts", "جهات اتصال الطوارئ"),
        ("profile.emergency_contacts", "جهات اتصال الطوارئ"),
        ("profile.no_contacts", "لا توجد جهات اتصال للطوارئ"),
        ("profile.sos_history", "سجل الاستغاثة"),
        ("profile.no_history", "لا توجد استغاثات سابقة"),
        ("profile.saved", "تم حفظ الملف الشخصي"),
        ("sos.button", "استغاثة"),
        ("sos.active", "الاستغاثة نشطة"),
        ("sos.confirm_title", "إرسال تنبيه طوارئ؟"),
        (
            "sos.confirm_body",
            "سيتم إبلاغ المتطوعين والجهات المختصة القريبة بموقعك.",
        ),
        ("sos.confirm", "إرسال الاستغاثة"),
        ("sos.cancel", "إلغاء"),
        ("sos.sent", "تم إرسال تنبيه الطوارئ"),
        ("sos.cancelled", "تم إلغاء الاستغاثة"),
        ("sos.follow_up_title", "بمن تريد الاتصال؟"),
        ("sos.call", "اتصال"),
        ("sos.close", "إغلاق"),
        ("notify.signed_in", "تم تسجيل الدخول باسم {name}"),
        ("notify.signed_out", "تم تسجيل الخروج"),
        ("notify.language_changed", "تم تغيير اللغة"),
    ],
};

static URDU: Bundle = Bundle {
    code: "ur",
    name: "اردو",
    direction: TextDirection::Rtl,
    entries: &[
        ("app.title", "حاجی ساتھی"),
        ("header.greeting", "خوش آمدید، {name}"),
        ("header.sign_in", "سائن ان"),
        ("header.sign_out", "سائن آؤٹ"),
        ("nav.home", "ہوم"),
        ("nav.lost_found", "گمشدہ و دستیاب"),
        ("nav.dashboard", "ڈیش بورڈ"),
        ("nav.profile", "پروفائل"),
        ("dashboard.pilgrim", "میرا سفر"),
        ("dashboard.volunteer", "رضاکار ڈیسک"),
        ("dashboard.authority", "کمانڈ سینٹر"),
        ("dashboard.admin", "انتظامیہ"),
        ("panel.itinerary", "سفری پروگرام"),
        ("panel.lost_found_reports", "گمشدگی کی رپورٹس"),
        ("panel.assigned_cases", "تفویض کردہ کیسز"),
        ("panel.active_alerts", "فعال الرٹس"),
        ("panel.zone_overview", "زون کا جائزہ"),
        ("panel.user_management", "صارفین کا انتظام"),
        ("panel.system_health", "سسٹم کی صورتحال"),
        ("panel.emergency_contacts", "ہنگامی رابطے"),
        ("profile.emergency_contacts", "ہنگامی رابطے"),
        ("profile.no_contacts", "کوئی ہنگامی رابطہ نہیں"),
        ("profile.sos_history", "ایس او ایس کی تاریخ"),
        ("profile.no_history", "کوئی سابقہ ایس او ایس نہیں"),
        ("profile.saved", "پروفائل محفوظ ہو گئی"),
        ("sos.button", "ایس او ایس"),
        ("sos.active", "ایس او ایس فعال ہے"),
        ("sos.confirm_title", "ہنگامی الرٹ بھیجیں؟"),
        (
            "sos.confirm_body",
            "قریبی رضاکاروں اور حکام کو آپ کے مقام کی اطلاع دی جائے گی۔",
        ),
        ("sos.confirm", "ایس او ایس بھیجیں"),
        ("sos.cancel", "منسوخ کریں"),
        ("sos.sent", "ہنگامی الرٹ بھیج دیا گیا"),
        ("sos.cancelled", "ایس او ایس منسوخ کر دیا گیا"),
        ("sos.follow_up_title", "آپ کس کو کال کرنا چاہتے ہیں؟"),
        ("sos.call", "کال کریں"),
        ("sos.close", "بند کریں"),
        ("notify.signed_in", "{name} کے طور پر سائن ان"),
        ("notify.signed_out", "آپ سائن آؤٹ ہو گئے"),
        ("notify.language_changed", "زبان تبدیل ہو گئی"),
    ],
};

static CATALOG: [&Bundle; 3] = [&ENGLISH, &ARABIC, &URDU];

/// Every available bundle, default first.
#[must_use]
pub fn catalog() -> &'static [&'static Bundle] {
    &CATALOG
}

/// The bundle every lookup falls back to.
#[must_use]
pub fn default_bundle() -> &'static Bundle {
    &ENGLISH
}

/// Find the bundle for an exact language code.
#[must_use]
pub fn lookup(code: &str) -> Option<&'static Bundle> {
    CATALOG.iter().copied().find(|bundle| bundle.code == code)
}

/// Find the bundle for `code`, or the default bundle.
#[must_use]
pub fn resolve(code: &str) -> &'static Bundle {
    lookup(code).unwrap_or_else(default_bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bundle_is_first_and_english() {
        assert_eq!(catalog()[0].code(), DEFAULT_LANGUAGE);
        assert_eq!(default_bundle().code(), DEFAULT_LANGUAGE);
        assert_eq!(default_bundle().direction(), TextDirection::Ltr);
    }

    #[test]
    fn test_catalog_bundles_share_keys() {
        let english: Vec<_> = default_bundle().keys().collect();
        for bundle in catalog() {
            let keys: Vec<_> = bundle.keys().collect();
            assert_eq!(keys, english, "bundle {} is out of sync", bundle.code());
        }
    }

    #[test]
    fn test_catalog_codes_unique() {
        let mut codes: Vec<_> = catalog().iter().map(|b| b.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), catalog().len());
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(resolve("ur").code(), "ur");
        assert_eq!(resolve("ur").direction(), TextDirection::Rtl);
        assert!(std::ptr::eq(resolve("xx-unknown"), default_bundle()));
        assert!(std::ptr::eq(resolve(""), default_bundle()));
        assert!(lookup("xx-unknown").is_none());
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(lookup("AR").is_none());
        assert!(lookup("ar-SA").is_none());
    }

    #[test]
    fn test_text_falls_back_to_key() {
        let arabic = resolve("ar");
        assert_eq!(arabic.text("sos.button"), "استغاثة");
        assert_eq!(arabic.text("does.not.exist"), "does.not.exist");
    }

    #[test]
    fn test_fill_placeholders() {
        let text = default_bundle().fill("header.greeting", &[("name", "Amina")]);
        assert_eq!(text, "Welcome, Amina");

        let untouched = default_bundle().fill("sos.button", &[("name", "Amina")]);
        assert_eq!(untouched, "SOS");
    }

    #[test]
    fn test_section_strips_prefix() {
        let nav: Vec<_> = default_bundle().section("nav").map(|(k, _)| k).collect();
        assert_eq!(nav, vec!["home", "lost_found", "dashboard", "profile"]);
        assert_eq!(default_bundle().section("nope").count(), 0);
    }

    #[test]
    fn test_section_does_not_match_partial_prefix() {
        // "sos" must not match "sos_extra.*" style keys or "so.*"
        assert_eq!(default_bundle().section("so").count(), 0);
    }
}
