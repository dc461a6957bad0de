use std::collections::HashSet;
use std::sync::LazyLock;

/// Prefix that lets custom event parameters bypass the fixed vocabularies.
pub const CUSTOM_EVENT_PREFIX: &str = "customEvent:";

/// Maximum number of reports accepted in a single batch request.
pub const MAX_BATCH_REPORTS: usize = 5;

/// Required length of a GA4 property id.
pub const PROPERTY_ID_LENGTH: usize = 9;

/// Metrics whose values are cast to integers in normalized rows.
pub const INTEGER_FIELDS: &[&str] = &[
    "visitors",
    "pageViews",
    "activeUsers",
    "newUsers",
    "screenPageViews",
    "active1DayUsers",
    "active7DayUsers",
    "active28DayUsers",
    "totalUsers",
];

/// GA4 metric names accepted by the validator.
pub const AVAILABLE_METRICS: &[&str] = &[
    "active1DayUsers",
    "active28DayUsers",
    "active7DayUsers",
    "activeUsers",
    "adUnitExposure",
    "addToCarts",
    "advertiserAdClicks",
    "advertiserAdCost",
    "advertiserAdCostPerClick",
    "advertiserAdCostPerConversion",
    "advertiserAdImpressions",
    "averagePurchaseRevenue",
    "averagePurchaseRevenuePerPayingUser",
    "averagePurchaseRevenuePerUser",
    "averageRevenuePerUser",
    "averageSessionDuration",
    "bounceRate",
    "cartToViewRate",
    "checkouts",
    "cohortActiveUsers",
    "cohortTotalUsers",
    "conversions",
    "crashAffectedUsers",
    "crashFreeUsersRate",
    "dauPerMau",
    "dauPerWau",
    "ecommercePurchases",
    "engagedSessions",
    "engagementRate",
    "eventCount",
    "eventCountPerUser",
    "eventValue",
    "eventsPerSession",
    "firstTimePurchaserConversionRate",
    "firstTimePurchasers",
    "firstTimePurchasersPerNewUser",
    "grossItemRevenue",
    "grossPurchaseRevenue",
    "itemDiscountAmount",
    "itemListClickEvents",
    "itemListClickThroughRate",
    "itemListViewEvents",
    "itemPromotionClickThroughRate",
    "itemRefundAmount",
    "itemRevenue",
    "itemViewEvents",
    "itemsAddedToCart",
    "itemsCheckedOut",
    "itemsClickedInList",
    "itemsClickedInPromotion",
    "itemsPurchased",
    "itemsViewed",
    "itemsViewedInList",
    "itemsViewedInPromotion",
    "newUsers",
    "organicGoogleSearchAveragePosition",
    "organicGoogleSearchClickThroughRate",
    "organicGoogleSearchClicks",
    "organicGoogleSearchImpressions",
    "promotionClicks",
    "promotionViews",
    "publisherAdClicks",
    "publisherAdImpressions",
    "purchaseRevenue",
    "purchaseToViewRate",
    "purchaserConversionRate",
    "refundAmount",
    "returnOnAdSpend",
    "screenPageViews",
    "screenPageViewsPerSession",
    "screenPageViewsPerUser",
    "scrolledUsers",
    "sessionConversionRate",
    "sessions",
    "sessionsPerUser",
    "shippingAmount",
    "taxAmount",
    "totalAdRevenue",
    "totalPurchasers",
    "totalRevenue",
    "totalUsers",
    "transactions",
    "transactionsPerPurchaser",
    "userConversionRate",
    "userEngagementDuration",
    "wauPerMau",
];

/// GA4 dimension names accepted by the validator.
pub const AVAILABLE_DIMENSIONS: &[&str] = &[
    "achievementId",
    "adFormat",
    "adSourceName",
    "adUnitName",
    "appVersion",
    "audienceName",
    "brandingInterest",
    "browser",
    "campaignId",
    "campaignName",
    "character",
    "city",
    "cityId",
    "cohort",
    "cohortNthDay",
    "cohortNthMonth",
    "cohortNthWeek",
    "contentGroup",
    "contentId",
    "contentType",
    "continent",
    "continentId",
    "country",
    "countryId",
    "currencyCode",
    "date",
    "dateHour",
    "dateHourMinute",
    "day",
    "dayOfWeek",
    "dayOfWeekName",
    "defaultChannelGroup",
    "deviceCategory",
    "deviceModel",
    "eventName",
    "fileExtension",
    "fileName",
    "firstSessionDate",
    "firstUserCampaignId",
    "firstUserCampaignName",
    "firstUserDefaultChannelGroup",
    "firstUserGoogleAdsAccountName",
    "firstUserGoogleAdsAdGroupId",
    "firstUserGoogleAdsAdGroupName",
    "firstUserGoogleAdsAdNetworkType",
    "firstUserGoogleAdsCampaignId",
    "firstUserGoogleAdsCampaignName",
    "firstUserGoogleAdsCampaignType",
    "firstUserGoogleAdsCreativeId",
    "firstUserGoogleAdsCustomerId",
    "firstUserGoogleAdsKeyword",
    "firstUserGoogleAdsQuery",
    "firstUserManualAdContent",
    "firstUserManualTerm",
    "firstUserMedium",
    "firstUserSource",
    "firstUserSourceMedium",
    "firstUserSourcePlatform",
    "fullPageUrl",
    "googleAdsAccountName",
    "googleAdsAdGroupId",
    "googleAdsAdGroupName",
    "googleAdsAdNetworkType",
    "googleAdsCampaignId",
    "googleAdsCampaignName",
    "googleAdsCampaignType",
    "googleAdsCreativeId",
    "googleAdsCustomerId",
    "googleAdsKeyword",
    "googleAdsQuery",
    "groupId",
    "hostName",
    "hour",
    "isConversionEvent",
    "isoWeek",
    "isoYear",
    "isoYearIsoWeek",
    "itemAffiliation",
    "itemBrand",
    "itemCategory",
    "itemCategory2",
    "itemCategory3",
    "itemCategory4",
    "itemCategory5",
    "itemId",
    "itemListId",
    "itemListName",
    "itemListPosition",
    "itemLocationID",
    "itemName",
    "itemPromotionCreativeName",
    "itemPromotionCreativeSlot",
    "itemPromotionId",
    "itemPromotionName",
    "itemVariant",
    "landingPage",
    "landingPagePlusQueryString",
    "language",
    "languageCode",
    "level",
    "linkClasses",
    "linkDomain",
    "linkId",
    "linkText",
    "linkUrl",
    "manualAdContent",
    "manualTerm",
    "medium",
    "method",
    "minute",
    "mobileDeviceBranding",
    "mobileDeviceMarketingName",
    "mobileDeviceModel",
    "month",
    "newVsReturning",
    "nthDay",
    "nthHour",
    "nthMinute",
    "nthMonth",
    "nthWeek",
    "nthYear",
    "operatingSystem",
    "operatingSystemVersion",
    "operatingSystemWithVersion",
    "orderCoupon",
    "outbound",
    "pageLocation",
    "pagePath",
    "pagePathPlusQueryString",
    "pageReferrer",
    "pageTitle",
    "percentScrolled",
    "platform",
    "platformDeviceCategory",
    "region",
    "screenResolution",
    "searchTerm",
    "sessionCampaignId",
    "sessionCampaignName",
    "sessionDefaultChannelGroup",
    "sessionGoogleAdsAccountName",
    "sessionGoogleAdsAdGroupId",
    "sessionGoogleAdsAdGroupName",
    "sessionGoogleAdsAdNetworkType",
    "sessionGoogleAdsCampaignId",
    "sessionGoogleAdsCampaignName",
    "sessionGoogleAdsCampaignType",
    "sessionGoogleAdsCreativeId",
    "sessionGoogleAdsCustomerId",
    "sessionGoogleAdsKeyword",
    "sessionGoogleAdsQuery",
    "sessionManualAdContent",
    "sessionManualTerm",
    "sessionMedium",
    "sessionSa360AdGroupName",
    "sessionSa360CampaignId",
    "sessionSa360CampaignName",
    "sessionSa360CreativeFormat",
    "sessionSa360EngineAccountId",
    "sessionSa360EngineAccountName",
    "sessionSa360EngineAccountType",
    "sessionSa360KeywordMatchType",
    "sessionSa360KeywordText",
    "sessionSource",
    "sessionSourceMedium",
    "sessionSourcePlatform",
    "shippingTier",
    "signedInWithUserId",
    "source",
    "sourceMedium",
    "sourcePlatform",
    "streamId",
    "streamName",
    "testDataFilterId",
    "testDataFilterName",
    "transactionId",
    "unifiedPagePathScreen",
    "unifiedPageScreen",
    "unifiedScreenClass",
    "unifiedScreenName",
    "userAgeBracket",
    "userGender",
    "videoProvider",
    "videoTitle",
    "videoUrl",
    "virtualCurrencyName",
    "visible",
    "week",
    "year",
    "yearMonth",
    "yearWeek",
];

static METRIC_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| AVAILABLE_METRICS.iter().copied().collect());
static DIMENSION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| AVAILABLE_DIMENSIONS.iter().copied().collect());

pub fn is_known_metric(name: &str) -> bool {
    METRIC_SET.contains(name)
}

pub fn is_known_dimension(name: &str) -> bool {
    DIMENSION_SET.contains(name)
}

pub fn is_custom_field(name: &str) -> bool {
    name.starts_with(CUSTOM_EVENT_PREFIX)
}
