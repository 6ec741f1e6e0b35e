pub(super) const ENTRIES: &[(&str, &str)] = &[
    ("common.appName", "AV Stream Space"),
    ("common.login", "登录"),
    ("common.logout", "退出"),
    ("common.dashboard", "全景驾驶舱"),
    ("common.media", "媒体管理"),
    ("common.live", "直播管理"),
    ("common.ai", "AI服务"),
    ("common.monitor", "系统监控"),
    ("common.settings", "系统设置"),
    ("common.save", "保存"),
    ("common.cancel", "取消"),
    ("common.confirm", "确认"),
    ("common.delete", "删除"),
    ("common.edit", "编辑"),
    ("common.add", "添加"),
    ("common.search", "搜索"),
    ("common.reset", "重置"),
    ("common.operation", "操作"),
    ("common.status", "状态"),
    ("common.createTime", "创建时间"),
    ("common.updateTime", "更新时间"),
    ("common.loading", "加载中..."),
    ("common.notFound", "页面未找到"),
    ("login.title", "智能音视频流媒体平台"),
    ("login.username", "用户名"),
    ("login.password", "密码"),
    ("login.rememberMe", "记住我"),
    ("login.loginBtn", "登录"),
    ("login.usernameRequired", "请输入用户名"),
    ("login.passwordRequired", "请输入密码"),
    ("dashboard.title", "全景驾驶舱"),
    ("dashboard.stats.totalStreams", "总流数"),
    ("dashboard.stats.activeStreams", "活跃流"),
    ("dashboard.stats.totalUsers", "总用户数"),
    ("dashboard.stats.onlineUsers", "在线用户"),
    ("dashboard.stats.storageUsage", "存储使用"),
    ("dashboard.stats.cpuUsage", "CPU使用率"),
    ("dashboard.stats.memoryUsage", "内存使用率"),
    ("dashboard.charts.streamTrend", "流媒体趋势"),
    ("dashboard.charts.userActivity", "用户活跃度"),
    ("dashboard.charts.systemLoad", "系统负载"),
    ("media.title", "媒体管理"),
    ("media.upload", "上传媒体"),
    ("media.videoList", "视频列表"),
    ("media.audioList", "音频列表"),
    ("media.imageList", "图片列表"),
    ("media.fileName", "文件名"),
    ("media.fileSize", "文件大小"),
    ("media.duration", "时长"),
    ("media.format", "格式"),
    ("media.uploadTime", "上传时间"),
    ("live.title", "直播管理"),
    ("live.createStream", "创建直播流"),
    ("live.streamList", "直播流列表"),
    ("live.streamKey", "流密钥"),
    ("live.streamUrl", "流地址"),
    ("live.status", "状态"),
    ("live.viewers", "观看人数"),
    ("live.startTime", "开始时间"),
    ("live.endTime", "结束时间"),
    ("live.actions", "操作"),
    ("live.startLive", "开始直播"),
    ("live.stopLive", "停止直播"),
    ("ai.title", "AI智能服务"),
    ("ai.voice", "语音处理"),
    ("ai.image", "图像生成"),
    ("ai.imageProcessing", "图像处理"),
    ("ai.analysis", "智能分析"),
    ("ai.speechToText", "语音转文字"),
    ("ai.textToSpeech", "文字转语音"),
    ("ai.imageGeneration", "图像生成"),
    ("ai.videoAnalysis", "视频分析"),
    ("ai.uploadFile", "上传文件"),
    ("ai.process", "处理"),
    ("ai.result", "结果"),
    ("monitor.title", "系统监控"),
    ("monitor.system", "系统监控"),
    ("monitor.services", "服务状态"),
    ("monitor.logs", "日志监控"),
    ("monitor.performance", "性能指标"),
    ("monitor.uptime", "运行时间"),
    ("monitor.responseTime", "响应时间"),
    ("monitor.errorRate", "错误率"),
    ("settings.title", "系统设置"),
    ("settings.general", "通用设置"),
    ("settings.security", "安全设置"),
    ("settings.storage", "存储设置"),
    ("settings.ai", "AI设置"),
    ("settings.stream", "流媒体设置"),
    ("settings.saveSuccess", "保存成功"),
];
