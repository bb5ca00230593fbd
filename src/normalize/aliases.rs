//! Builtin alias tables.
//!
//! Each table is an ordered list of `(alias, canonical)` pairs. For the general
//! dimensions the order is the match priority, so an alias must never overlap
//! (as a substring, in either direction) with an alias of a different target.
//! Company aliases are re-sorted longest-first by [`CompanyMatcher`].
//!
//! [`CompanyMatcher`]: super::CompanyMatcher

pub const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("数据开发", "Data"),
    ("数据分析", "Data"),
    ("数据科学", "Data"),
    ("算法", "Data"),
    ("机器学习", "Data"),
    ("data scientist", "Data"),
    ("data analyst", "Data"),
    ("data engineer", "Data"),
    ("machine learning", "Data"),
    ("产品经理", "PM"),
    ("产品", "PM"),
    ("product manager", "PM"),
    ("项目经理", "PM"),
    ("交互设计", "Design"),
    ("UI设计", "Design"),
    ("视觉", "Design"),
    ("设计", "Design"),
    ("designer", "Design"),
    ("运维", "Infra"),
    ("SRE", "Infra"),
    ("DevOps", "Infra"),
    ("基础架构", "Infra"),
    ("云计算", "Infra"),
    ("infrastructure", "Infra"),
    ("前端", "SWE"),
    ("后端", "SWE"),
    ("客户端", "SWE"),
    ("全栈", "SWE"),
    ("研发", "SWE"),
    ("软件工程师", "SWE"),
    ("software engineer", "SWE"),
    ("程序员", "SWE"),
    ("码农", "SWE"),
    ("SDE", "SWE"),
    ("其他", "Other"),
    ("其它", "Other"),
];

pub const RECRUIT_TYPE_ALIASES: &[(&str, &str)] = &[
    ("实习", "intern"),
    ("internship", "intern"),
    ("校招", "newgrad"),
    ("应届", "newgrad"),
    ("秋招", "newgrad"),
    ("春招", "newgrad"),
    ("new grad", "newgrad"),
    ("new-grad", "newgrad"),
    ("campus", "newgrad"),
    ("社招", "experienced"),
    ("跳槽", "experienced"),
    ("lateral", "experienced"),
];

pub const EXPERIENCE_ALIASES: &[(&str, &str)] = &[
    ("无经验", "0-1"),
    ("一年以内", "0-1"),
    ("1年以下", "0-1"),
    ("1-3年", "1-3"),
    ("junior", "1-3"),
    ("3-5年", "3-5"),
    ("mid-level", "3-5"),
    ("5-10年", "5-10"),
    ("senior", "5-10"),
    ("10年以上", "10+"),
    ("staff", "10+"),
    ("principal", "10+"),
];

pub const SALARY_ALIASES: &[(&str, &str)] = &[
    ("10k以下", "0-10k"),
    ("1-2万", "10-20k"),
    ("白菜", "10-20k"),
    ("2-3万", "20-30k"),
    ("3-5万", "30-50k"),
    ("5万以上", "50k+"),
    ("年薪百万", "50k+"),
];

pub const COMPANY_ALIASES: &[(&str, &str)] = &[
    ("谷歌", "Google"),
    ("狗家", "Google"),
    ("买它", "Meta"),
    ("脸书", "Meta"),
    ("facebook", "Meta"),
    ("fb", "Meta"),
    ("亚马逊", "Amazon"),
    ("亚麻", "Amazon"),
    ("aws", "Amazon"),
    ("微软", "Microsoft"),
    ("巨硬", "Microsoft"),
    ("苹果", "Apple"),
    ("水果", "Apple"),
    ("网飞", "Netflix"),
    ("奈飞", "Netflix"),
    ("字节跳动", "ByteDance"),
    ("字节", "ByteDance"),
    ("抖音", "ByteDance"),
    ("tiktok", "ByteDance"),
    ("阿里巴巴", "Alibaba"),
    ("阿里", "Alibaba"),
    ("淘宝", "Alibaba"),
    ("腾讯", "Tencent"),
    ("鹅厂", "Tencent"),
    ("鹅", "Tencent"),
    ("百度", "Baidu"),
    ("美团", "Meituan"),
    ("京东", "JD"),
    ("拼多多", "Pinduoduo"),
    ("pdd", "Pinduoduo"),
    ("快手", "Kuaishou"),
    ("小米", "Xiaomi"),
    ("华为", "Huawei"),
    ("网易", "NetEase"),
    ("猪厂", "NetEase"),
    ("滴滴", "Didi"),
    ("英伟达", "Nvidia"),
    ("老黄", "Nvidia"),
    ("特斯拉", "Tesla"),
    ("蚂蚁金服", "Ant Group"),
    ("蚂蚁", "Ant Group"),
    ("虾皮", "Shopee"),
    ("领英", "LinkedIn"),
    ("优步", "Uber"),
    ("爱彼迎", "Airbnb"),
];
